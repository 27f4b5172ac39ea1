use crate::core::{BatchReport, Pipeline};
use crate::utils::error::Result;

pub struct BatchEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BatchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self) -> Result<BatchReport> {
        tracing::info!("Starting CCP batch derivation");

        let table = self.pipeline.extract()?;
        tracing::info!("Extracted {} client rows", table.rows.len());

        let derived = self.pipeline.transform(table)?;
        tracing::info!(
            "Derived {} of {} rows ({} invalid, {} without account)",
            derived.report.valid,
            derived.report.rows,
            derived.report.invalid,
            derived.report.pending
        );

        let report = self.pipeline.load(derived)?;
        for output in &report.outputs {
            tracing::info!("Output saved to: {}", output);
        }

        Ok(report)
    }
}
