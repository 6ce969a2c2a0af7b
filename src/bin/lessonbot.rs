use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use lessonbot::config::Config;
use lessonbot::pipeline::Pipeline;
use std::env;
use std::sync::Arc;

fn usage() {
    eprintln!("Usage: lessonbot                      run the Telegram bot");
    eprintln!("       lessonbot --print [YYYY-MM-DD] print a day's schedule");
    eprintln!("Config: $LESSONBOT_CONFIG or ~/.config/lessonbot/config.toml, token via $TOKEN");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::load()?;
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("--print") => {
            let date = match args.get(2) {
                Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .with_context(|| format!("Bad date {:?}, expected YYYY-MM-DD", raw))?,
                None => Local::now().date_naive(),
            };
            let pipeline = Pipeline::new(Arc::new(config));
            let outcome = pipeline.schedule_for(date).await;
            for chunk in pipeline.render_chunks(outcome.day()) {
                println!("{}", chunk);
                println!("----");
            }
            Ok(())
        }
        Some("--help") | Some("-h") => {
            usage();
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown argument: {}", other);
            usage();
            Ok(())
        }
        None => lessonbot::bot::run(config).await,
    }
}
