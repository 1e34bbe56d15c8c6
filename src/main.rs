use airspace_watch::cli::Cli;
use airspace_watch::config::ApplicationConfig;
use airspace_watch::controller::MonitorController;
use airspace_watch::logging::setup_logging;
use airspace_watch::region::RegionInputs;
use clap::Parser;
use log::info;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.logging_level);
    info!("Main: Application started.");

    if let Err(err) = run(&cli) {
        log::error!("{err}");
        return std::process::ExitCode::FAILURE;
    }

    info!("Main: Program finished.");
    std::process::ExitCode::SUCCESS
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let application_config = match &cli.config_file {
        Some(path) => ApplicationConfig::construct_from_path(path)?,
        None => ApplicationConfig::default(),
    };
    let endpoint = cli
        .endpoint
        .clone()
        .unwrap_or_else(|| application_config.tracker.endpoint.clone());

    let mut controller = MonitorController::new(application_config.monitor_settings()?);

    if cli.gui {
        let bounds = RegionInputs::from(&application_config.region);
        airspace_watch::gui::run(controller, endpoint, bounds)?;
        return Ok(());
    }

    let region = application_config.region.to_region()?;
    controller.start_in_region(&endpoint, region)?;

    if let Some(duration) = cli.duration {
        std::thread::sleep(std::time::Duration::from_secs(duration));
        controller.stop();
    } else {
        controller.wait();
    }
    Ok(())
}
