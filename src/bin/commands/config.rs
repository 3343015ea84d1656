use clap::Args;
use ipstack::{IpstackConfig, OutputFormat};
use serde::Serialize;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Also print the config file path
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    access_key: String,
    #[serde(flatten)]
    settings: &'a IpstackConfig,
}

pub fn run(config: &IpstackConfig, args: ConfigArgs, output_format: OutputFormat) -> bool {
    let ConfigArgs { verbose } = args;

    let config_file = if verbose {
        IpstackConfig::config_file_path().ok()
    } else {
        None
    };

    if !output_format.is_json() {
        // Table, Markdown, and PSV all use the same human-readable format
        println!("ipstack Configuration");
        println!("=====================\n");
        if let Some(path) = &config_file {
            println!("Config File:        {}", path);
        }
        println!("{}", config.summary());
        return true;
    }

    let info = ConfigInfo {
        config_file,
        access_key: config.masked_access_key(),
        settings: config,
    };

    let serialized = match output_format {
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&info),
        _ => serde_json::to_string(&info),
    };
    match serialized {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            eprintln!("Error serializing config info: {}", e);
            false
        }
    }
}
