use clap::Parser;
use truemoney_gateway::config::cli::Command;
use truemoney_gateway::core::signature;
use truemoney_gateway::utils::logger;
use truemoney_gateway::{CallbackData, CliConfig, ConfigProvider, PaymentGateway, TrueMoneyApi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting truemoney-gateway CLI");

    let config = match cli.load_gateway_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    if config.sandbox_mode() {
        tracing::info!("🧪 Sandbox mode enabled");
    }

    let api = TrueMoneyApi::new(config);

    let outcome = match &cli.command {
        Command::Payload(args) => {
            let order = args.to_order(api.config());
            args.override_map()
                .and_then(|overrides| api.signed_payload(&order, overrides))
                .and_then(|payload| serde_json::to_string_pretty(&payload).map_err(Into::into))
        }
        Command::Create(args) => {
            let order = args.to_order(api.config());
            match args.override_map() {
                Ok(overrides) => api.render(&order, overrides).await.map(|rendered| {
                    tracing::info!("📄 Reference id: {}", rendered.payment_id);
                    rendered.form.to_html()
                }),
                Err(e) => Err(e),
            }
        }
        Command::Enquiry { payment_id } => {
            let callback: CallbackData = [("payment_id", payment_id.as_str())].into_iter().collect();
            match api.backend_result(&callback).await {
                Ok(result) => serde_json::to_string_pretty(&result).map_err(Into::into),
                Err(e) => Err(e),
            }
        }
        Command::Sign { message } => Ok(signature::sign(
            api.config().merchant_account().secret(),
            message,
        )),
    };

    match outcome {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ {} failed: {}", api.gateway_name(), e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }
}
