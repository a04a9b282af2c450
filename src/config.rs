use std::collections::HashMap;
use std::env;
use std::fs;
use std::time::Duration;

/// The installation polls the shaft twice a second.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(500);

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub struct ConfigFile {
    pub settings: HashMap<String, u64>,
}

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub top_floor: u8,
    pub poll_period: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: ControllerSettings,
}

impl Config {
    pub fn get() -> Self {
        let file_path = "config.json";
        let fallback_file_path = "_config.json";
        let config_contents = match fs::read_to_string(file_path) {
            Ok(content) => content,
            Err(_) => {
                println!("No configuration file provided, using default settings...");
                fs::read_to_string(fallback_file_path).unwrap()
            },
        };
        let config_file: ConfigFile = serde_json::from_str(&config_contents).unwrap();
        let (top_floor, poll_period_ms) = parse_env_args(
            config_file.settings["topFloor"] as u8,
            config_file.settings["pollPeriodMs"],
        );

        Config {
            settings: ControllerSettings {
                top_floor,
                poll_period: Duration::from_millis(poll_period_ms),
            },
        }
    }
}

fn parse_env_args(default_top_floor: u8, default_period_ms: u64) -> (u8, u64) {
    let (mut top_floor, mut period_ms) = (default_top_floor, default_period_ms);

    let args: Vec<String> = env::args().collect();
    for arg_pair in args.rchunks_exact(2) {
        match arg_pair[0].as_str() {
            "--topfloor" => {
                top_floor = match arg_pair[1].parse::<u8>() {
                    Ok(num) => num,
                    Err(_) => {
                        println!("top floor {} is not a number, skipping...", arg_pair[1]);
                        top_floor
                    },
                };
            },
            "--period" => {
                period_ms = match arg_pair[1].parse::<u64>() {
                    Ok(num) => num,
                    Err(_) => {
                        println!("period {} is not a number, skipping...", arg_pair[1]);
                        period_ms
                    },
                };
            },
            _ => {println!("illegal argument {}, skipping...", arg_pair[0]);},
        }
    }
    (top_floor, period_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_settings_from_json() {
        let contents = r#"{"settings": {"topFloor": 3, "pollPeriodMs": 500}}"#;
        let config_file: ConfigFile = serde_json::from_str(contents).unwrap();
        assert_eq!(config_file.settings["topFloor"], 3);
        assert_eq!(config_file.settings["pollPeriodMs"], 500);
    }
}
