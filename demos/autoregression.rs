use crispml::params::TimeSeriesParams;
use crispml::stationarity::{AdfOptions, adfuller};
use crispml::{AutoRegressive, Vector, synthetic};
use ndarray::Axis;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Step 1: v(t) = 0.6 v(t-1) - 0.3 v(t-2) + e(t)
    let params = TimeSeriesParams {
        sample_count: 1000,
        seed: Some(3),
        ..TimeSeriesParams::default()
    };
    params.validate()?;
    let mut rng = synthetic::rng_from_seed(params.seed);
    let series = synthetic::autoregressive(&params, &mut rng)?;

    // Step 2: Stationarity check
    let adf = adfuller(&series, AdfOptions::default())?;
    println!("ADF statistic: {:.4}, p-value: {:.4}", adf.statistic, adf.p_value);
    println!("Series is {}", adf.conclusion());

    // Step 3: Its cumulative sum is a random walk
    let mut walk: Vector = series.clone();
    walk.accumulate_axis_inplace(Axis(0), |&prev, cur| *cur += prev);
    let walk_adf = adfuller(&walk, AdfOptions::default())?;
    println!("Cumulative sum p-value: {:.4} ({})", walk_adf.p_value, walk_adf.conclusion());

    // Step 4: Fit AR(2) and forecast
    let mut model = AutoRegressive::new(params.ar_lag_count as usize);
    model.fit(&series)?;
    if let Some(coeffs) = &model.coefficients {
        println!("Coefficients: {:.4}", coeffs);
    }
    let forecast = model.forecast(params.forecast_horizon as usize)?;
    println!("Forecast: {:.4}", forecast);

    Ok(())
}
