/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Received level offset: dBm = [RX_LEVEL_OFFSET_DBM] + level / 2
pub const RX_LEVEL_OFFSET_DBM: f64 = -113.0;

/// Maximal base station transmit power (mW) used as path loss reference.
pub const MAX_TX_POWER_MW: f64 = 20_000.0;

/// Default base station antenna height (meters)
pub const DEFAULT_BASE_HEIGHT_M: f64 = 80.0;

/// Default mobile station antenna height (meters)
pub const DEFAULT_MOBILE_HEIGHT_M: f64 = 3.0;

/// Towers closer than this (meters) are considered identical
pub const DUPLICATE_TOWER_THRESHOLD_M: f64 = 1.0;

/// Floor (km) added to the residual error to form the uncertainty radius
pub const RADIUS_FLOOR_KM: f64 = 0.1;

/// Optimizer convergence tolerance
pub const SOLVER_TOLERANCE: f64 = 1.0E-6;

/// Optimizer iteration cap
pub const SOLVER_MAX_ITERATIONS: usize = 100_000;

/// Box bounds applied by bounded optimization methods, on both parameters
pub const SOLVER_BOUNDS: (f64, f64) = (-90.0, 90.0);

/// ARFCN sentinel reported by modems when the channel is unknown
pub const ARFCN_UNKNOWN: u16 = u16::MAX;
