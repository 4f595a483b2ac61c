use crispml::metrics::mean_squared_error;
use crispml::params::SimpleParams;
use crispml::{LinearRegression, synthetic};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Step 1: Generate y = 3x + 5 + noise
    let params = SimpleParams {
        true_slope: 3.0,
        noise_scale: 2.0,
        sample_count: 300,
        seed: Some(42),
    };
    params.validate()?;
    let mut rng = synthetic::rng_from_seed(params.seed);
    let dataset = synthetic::simple_linear(&params, &mut rng)?;
    println!("Dataset: {} samples, {} features", dataset.n_samples(), dataset.n_features());

    // Step 2: Hold out the last 20% for evaluation
    let (train_data, test_data) = dataset.train_test_split(0.2)?;

    // Step 3: Fit ordinary least squares
    let mut model = LinearRegression::new();
    model.fit(&train_data.features, &train_data.labels)?;

    // Step 4: Evaluate
    let test_predictions = model.predict(&test_data.features)?;
    let test_mse = mean_squared_error(&test_data.labels, &test_predictions)?;
    let test_r2 = model.score(&test_data.features, &test_data.labels)?;

    println!("Results:");
    match test_r2 {
        Some(r2) => println!("  Test R² score: {:.4}", r2),
        None => println!("  Test R² score: undefined"),
    }
    println!("  Test MSE: {:.4} (noise variance {:.4})", test_mse, params.noise_scale.powi(2));

    if let Some(coeffs) = &model.coefficients {
        println!("  Slope: {:.4} (true {:.4})", coeffs[0], params.true_slope);
        println!("  Intercept: {:.4} (true 5.0000)", model.intercept.unwrap_or(0.0));
    }

    Ok(())
}
