use ipstack::lens::lookup::{LookupArgs, LookupClient, LookupError};
use ipstack::{IpstackConfig, OutputFormat};

/// Arguments for the Check command
pub type CheckArgs = LookupArgs;

pub fn run(config: IpstackConfig, args: CheckArgs, output_format: OutputFormat) -> bool {
    let config = args.apply_to(config);

    let client = match LookupClient::from_config(&config) {
        Ok(c) => c,
        Err(LookupError::MissingAccessKey) => {
            eprintln!(
                "ERROR: no access key configured, set access_key in the config file, IPSTACK_ACCESS_KEY, or pass --access-key"
            );
            return false;
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            return false;
        }
    };

    match client.check_bulk(&args.ips) {
        Ok(results) => {
            println!("{}", client.format_result(&results, &output_format));
            true
        }
        Err(e) => {
            eprintln!("ERROR: unable to get ip information: {e}");
            false
        }
    }
}
