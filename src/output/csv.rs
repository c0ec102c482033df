use crate::error::ArcClimateError;
use crate::pipeline::ClimateOutput;
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

impl ClimateOutput {
    /// Writes [`ClimateOutput::to_dataframe`] as a headered CSV file.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), ArcClimateError> {
        let path = path.as_ref();
        let mut df = self.to_dataframe()?;
        let mut file =
            File::create(path).map_err(|e| ArcClimateError::CsvWriteIo(path.to_path_buf(), e))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .map_err(|e| ArcClimateError::CsvWritePolars(path.to_path_buf(), e))?;
        info!("Wrote {} rows to {}", df.height(), path.display());
        Ok(())
    }
}
