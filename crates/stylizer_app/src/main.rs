//! Headless runner: submits one job, waits for it and saves the result.
//!
//! Usage: `stylizer_app <content-image> <style-image|preset-url> [resolution] [intensity]`

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use stylizer_app::{
    initialize_logging, load_asset, LifecycleController, LogDestination, LoggingObserver,
    StylizerConfig,
};
use stylizer_core::{Intensity, Msg, Phase, Resolution};

const USAGE: &str =
    "usage: stylizer_app <content-image> <style-image|preset-url> [resolution] [intensity]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    initialize_logging(LogDestination::Terminal);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [content, style, rest @ ..] = args.as_slice() else {
        bail!(USAGE);
    };

    let config = StylizerConfig::from_env()?;
    let mut controller = LifecycleController::from_config(&config, Arc::new(LoggingObserver))?;

    controller.dispatch(Msg::ContentSelected(load_asset(Path::new(content))?));
    if style.starts_with("http://") || style.starts_with("https://") {
        controller.dispatch(Msg::PresetSelected { url: style.clone() });
        controller.run_until_settled().await;
    } else {
        controller.dispatch(Msg::StyleUploaded(load_asset(Path::new(style))?));
    }

    if let Some(raw) = rest.first() {
        let pixels: u32 = raw
            .parse()
            .with_context(|| format!("resolution {raw:?} is not a number"))?;
        controller.dispatch(Msg::ResolutionChanged(Resolution::try_from(pixels)?));
    }
    if let Some(raw) = rest.get(1) {
        let value: i64 = raw
            .parse()
            .with_context(|| format!("intensity {raw:?} is not a number"))?;
        controller.dispatch(Msg::IntensityChanged(Intensity::try_from(value)?));
    }

    controller.dispatch(Msg::StylizeClicked);
    controller.run_until_settled().await;

    match controller.phase().clone() {
        Phase::Succeeded(locator) => {
            controller.dispatch(Msg::DownloadClicked);
            controller.run_until_settled().await;
            let path = controller
                .save_artifact(&config.output_dir)
                .with_context(|| format!("could not save result from {locator}"))?;
            println!("{}", path.display());
        }
        Phase::Failed(reason) => {
            bail!("{reason}: {}", controller.view().status_message);
        }
        _ => {
            bail!("{}", controller.view().status_message);
        }
    }

    controller.dispose();
    Ok(())
}
