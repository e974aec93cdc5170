use crate::prelude::{
    Config, ErrorMetric, Method, PropagationContext, PropagationModel, TowerSelection,
};

#[test]
fn default_config() {
    let cfg: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, Config::default());
}

#[test]
fn custom_config() {
    let content = r#"
    {
        "metric": "MSE",
        "method": "LBfgsB",
        "max_towers": 3,
        "selection": { "Random": { "seed": 7 } },
        "propagation": {
            "model": {
                "Cost231": {
                    "urban": true,
                    "base_height_m": 30.0,
                    "mobile_height_m": 1.5
                }
            },
            "frequency_mhz": 1800.0
        }
    }"#;

    let cfg: Config = serde_json::from_str(content).unwrap();
    assert_eq!(cfg.metric, ErrorMetric::MSE);
    assert_eq!(cfg.method, Method::LBfgsB);
    assert_eq!(cfg.max_towers, Some(3));
    assert_eq!(cfg.selection, TowerSelection::Random { seed: 7 });
    assert_eq!(
        cfg.propagation.model,
        PropagationModel::Cost231 {
            urban: true,
            base_height_m: 30.0,
            mobile_height_m: 1.5,
        }
    );
    assert_eq!(cfg.propagation.frequency_mhz, Some(1800.0));
    assert_eq!(
        cfg.propagation.tx_power_dbm,
        PropagationContext::default().tx_power_dbm
    );
    assert!(cfg.validate().is_ok());
}

#[test]
fn hata_config() {
    let content = r#"
    {
        "propagation": {
            "model": {
                "Hata": {
                    "environment": "Open",
                    "base_height_m": 50.0,
                    "mobile_height_m": 1.5
                }
            },
            "tx_power_dbm": 40.0
        }
    }"#;
    let cfg: Config = serde_json::from_str(content).unwrap();
    assert_eq!(cfg.metric, ErrorMetric::MAE);
    assert_eq!(cfg.propagation.tx_power_dbm, 40.0);
    assert!(cfg.propagation.frequency_mhz.is_none());
}
