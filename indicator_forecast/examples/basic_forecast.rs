use chrono::{Datelike, Duration, NaiveDate};
use indicator_forecast::aggregate::{period_variation, rank_by_variation};
use indicator_forecast::{
    Horizon, IndicatorCatalog, IndicatorPipeline, IndicatorRequest, Period, TimeSeries,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Indicator Forecast: Basic Outlook Example");
    println!("=========================================\n");

    let catalog = IndicatorCatalog::brazilian_macro();
    let mut rng = StdRng::seed_from_u64(2024);
    let rate_shock = Normal::new(0.0, 1.0)?;
    let inflation = Normal::new(0.4, 0.25)?;
    let activity_noise = Normal::new(0.0, 4000.0)?;
    let rate_start = NaiveDate::from_ymd_opt(2021, 1, 4).ok_or("invalid start date")?;

    let requests: Vec<IndicatorRequest> = catalog
        .iter()
        .map(|profile| {
            let series = match profile.cadence {
                Period::Daily => sample_daily_rate(&mut rng, &rate_shock, rate_start, 3 * 365),
                _ if profile.trend_mode => sample_monthly_trend(&mut rng, &activity_noise, 60),
                _ => monthly(60, |_| inflation.sample(&mut rng)),
            };
            IndicatorRequest::new(profile.clone(), series)
        })
        .collect();

    println!("Last-30-day variation:");
    for request in &requests {
        match period_variation(&request.series, Period::Daily) {
            Ok(variation) => println!("  {:<11} {:+.2}%", request.profile.name, variation),
            Err(err) => println!("  {:<11} n/a ({})", request.profile.name, err),
        }
    }

    let entities: Vec<(String, TimeSeries)> = requests
        .iter()
        .map(|r| (r.profile.name.clone(), r.series.clone()))
        .collect();
    let ranking = rank_by_variation(&entities, Period::Yearly, 2)?;
    if let Some(best) = ranking.best.first() {
        println!("\nBest yearly performer: {} ({:+.2}%)", best.name, best.variation);
    }

    let horizon = Horizon::new(6)?;
    println!("\nForecasting {} months ahead...\n", horizon.get());

    for (name, result) in IndicatorPipeline::run_all(&requests, horizon) {
        let outlook = match result {
            Ok(outlook) => outlook,
            Err(err) => {
                println!("{}: unavailable ({})\n", name, err);
                continue;
            }
        };

        let kind = catalog
            .get(&name)
            .map(|profile| profile.value_kind)
            .unwrap_or_default();

        println!("{} (current {})", name, kind.format(outlook.snapshot.current));
        println!("{}", outlook.metrics);
        for i in 0..outlook.forecast.len() {
            println!(
                "  {}  {}  [{} .. {}]",
                outlook.forecast.dates[i],
                kind.format(outlook.forecast.point[i]),
                kind.format(outlook.forecast.lower[i]),
                kind.format(outlook.forecast.upper[i])
            );
        }
        println!();
    }

    Ok(())
}

/// Policy rate sampled every business day, moving in 25bp steps
fn sample_daily_rate(
    rng: &mut StdRng,
    shock: &Normal<f64>,
    start: NaiveDate,
    days: usize,
) -> TimeSeries {
    let mut rate = 2.0;

    let pairs = (0..days)
        .map(|i| start + Duration::days(i as i64))
        .filter(|d| d.weekday().number_from_monday() <= 5)
        .map(|d| {
            if shock.sample(rng) > 2.2 {
                rate += 0.25;
            }
            (d, rate)
        });

    TimeSeries::from_unsorted(pairs)
}

/// Monthly activity level with growth and seasonality
fn sample_monthly_trend(rng: &mut StdRng, noise: &Normal<f64>, months: usize) -> TimeSeries {
    monthly(months, |i| {
        let season = ((i % 12) as f64 / 12.0 * std::f64::consts::TAU).sin() * 15000.0;
        700_000.0 + 2500.0 * i as f64 + season + noise.sample(rng)
    })
}

fn monthly(months: usize, mut value: impl FnMut(usize) -> f64) -> TimeSeries {
    let pairs = (0..months).filter_map(|i| {
        let year = 2019 + (i / 12) as i32;
        let month = (i % 12) as u32 + 1;
        NaiveDate::from_ymd_opt(year, month, 15).map(|d| (d, value(i)))
    });
    TimeSeries::from_unsorted(pairs)
}
