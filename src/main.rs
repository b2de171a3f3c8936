//! Weather trends report: fetch once, persist, analyze, render.

use log::info;
use weather_trends::{
    analyze, ChartSink, Config, ObservationStore, OpenMeteoClient, StoreError,
    WeatherTrendsError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    run(&Config::default()).await?;
    Ok(())
}

async fn run(config: &Config) -> Result<(), WeatherTrendsError> {
    let store = ObservationStore::new(&config.data_dir);
    let table = match store.load() {
        Ok(table) => table,
        Err(StoreError::NotFound(path)) => {
            info!("No dataset at {:?} yet, fetching from Open-Meteo", path);
            let client = OpenMeteoClient::new(config)?;
            let table = client
                .fetch_daily()
                .location(config.location)
                .start_date(config.start_date)
                .end_date(config.resolved_end_date())
                .timezone(&config.timezone)
                .call()
                .await?;
            store.save(&table)?;
            table
        }
        Err(e) => return Err(e.into()),
    };

    let output = analyze(&table)?;

    let sink = ChartSink::new(&config.plots_dir);
    for spec in &output.charts {
        sink.render(spec)?;
    }

    println!("\n{}", output.stats);
    Ok(())
}
