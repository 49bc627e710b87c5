use rand::rngs::StdRng;
use rand::SeedableRng;

use tabular_dnn::{make_batches, ActivationFunction, Dataset, DnnClassifier, OptimizerKind, Row, TARGET};

fn main() -> tabular_dnn::Result<()> {
    let mut rng = StdRng::seed_from_u64(0);

    let rows: Vec<Row> = [(0.0, 0.0, 0.0), (0.0, 1.0, 1.0), (1.0, 0.0, 1.0), (1.0, 1.0, 0.0)]
        .iter()
        .map(|&(a, b, y)| {
            Row::from([("a".to_string(), a), ("b".to_string(), b), (TARGET.to_string(), y)])
        })
        .collect();
    let data = Dataset::new(rows)?;
    let feeder = make_batches(&data, true, 4)?;

    let mut model = DnnClassifier::build(
        vec!["a".into(), "b".into()],
        vec![8],
        2,
        ActivationFunction::Tanh,
        &mut rng,
    )?;
    model.compile(OptimizerKind::Adam, model.default_loss(), 0.05)?;

    let history = model.fit(&feeder, None, 500, &mut rng)?;
    for stats in history.iter().step_by(100) {
        println!("Epoch {}: loss = {:.6}", stats.epoch, stats.train_loss);
    }

    let ordered = make_batches(&data, false, 4)?;
    let predictions = model.predict(&ordered, &mut rng)?;
    for (row, p) in data.rows().iter().zip(&predictions) {
        println!("Input: ({}, {}) -> class {} {:.4?}", row["a"], row["b"], model.reduce_prediction(p), p);
    }
    Ok(())
}
