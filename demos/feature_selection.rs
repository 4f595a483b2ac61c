use crispml::params::MultipleParams;
use crispml::{LinearRegression, Rfe, synthetic};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Step 1: Eight features with true coefficients 2, 4, ..., 16
    let params = MultipleParams {
        noise_scale: 5.0,
        sample_count: 400,
        feature_count: 8,
        use_feature_selection: true,
        features_to_keep: 3,
        seed: Some(11),
    };
    params.validate()?;
    let mut rng = synthetic::rng_from_seed(params.seed);
    let (dataset, truth) = synthetic::multiple_linear(&params, &mut rng)?;

    // Step 2: Baseline on every feature
    let mut full = LinearRegression::new();
    full.fit(&dataset.features, &dataset.labels)?;
    let full_r2 = full.score(&dataset.features, &dataset.labels)?;

    // Step 3: Recursive feature elimination down to three features
    let mut rfe = Rfe::new(params.features_to_keep as usize);
    rfe.fit(&dataset.features, &dataset.labels)?;
    let selected = rfe.selected()?;
    let reduced = dataset.select_columns(&selected)?;
    let reduced_r2 = rfe.estimator()?.score(&reduced.features, &reduced.labels)?;

    println!("Ranking: {:?}", rfe.ranking()?);
    println!("Selected features: {:?}", selected);
    for (&j, coef) in selected.iter().zip(rfe.estimator()?.coefficients.iter().flatten()) {
        println!("  x{}: {:.4} (true {:.4})", j + 1, coef, truth[j]);
    }
    println!("R² all features: {:.4}", full_r2.unwrap_or(f64::NAN));
    println!("R² selected:     {:.4}", reduced_r2.unwrap_or(f64::NAN));

    Ok(())
}
