#![cfg_attr(not(debug_assertions), allow(warnings, unused))]
use clap::Parser;
use embedthumb::providers;

pub(crate) mod cli;
pub(crate) mod logger;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse arguments
    let args = cli::Args::parse();

    // Set up logger
    if let Err(err) = logger::init(args.debug) {
        eprintln!("Failed to set up logger: {}", err);
    }

    let code = match args.get_code() {
        Ok(code) => code,
        Err(err) => {
            log::error!("{:#}", err);
            std::process::exit(1);
        }
    };

    providers::init_detection_rules();

    if args.detect {
        println!("{}", providers::detect_provider(&code));
        return;
    }

    let thumbnail = match args.provider.as_deref() {
        Some(name) => {
            if !name.is_empty() {
                match providers::normalized_name(name) {
                    Some(display_name) => log::debug!("Using provider: {}", display_name),
                    None => log::warn!("No provider named \"{}\", the thumbnail will be undefined", name),
                }
            }

            providers::resolve_thumbnail_with_provider_name(&code, name).await
        }
        None => providers::resolve_thumbnail(&code, None).await,
    };

    if thumbnail.is_undefined() {
        log::debug!("No thumbnail found");
    }

    println!("{}", thumbnail);
}
