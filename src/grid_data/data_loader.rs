use crate::grid_data::error::GridDataError;
use crate::grid_data::extractor::COL_DATE;
use crate::types::variable::Variable;
use async_compression::tokio::bufread::GzipDecoder;
use futures_util::TryStreamExt;
use log::{info, warn};
use polars::frame::DataFrame;
use polars::prelude::*;
use reqwest::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::AsyncReadExt;
use tokio::{fs, task};
use tokio_util::io::StreamReader;

/// Directory of the per-cell basic datasets, relative to the mirror base URL.
pub const CELL_DATA_PATH: &str = "msm";

pub struct GridDataLoader {
    cache_dir: PathBuf,
    base_url: String,
    download_client: Client,
}

impl GridDataLoader {
    pub fn new(cache_dir: &Path, base_url: &str) -> GridDataLoader {
        GridDataLoader {
            cache_dir: cache_dir.to_path_buf(),
            base_url: base_url.trim_end_matches('/').to_string(),
            download_client: Client::new(),
        }
    }

    pub fn cache_path(&self, grid_id: &str) -> PathBuf {
        self.cache_dir.join(format!("msm_{grid_id}.parquet"))
    }

    /// Loads the basic dataset of one grid cell.
    ///
    /// Reads the parquet cache when present, otherwise downloads the gzipped
    /// CSV from the mirror and caches it as parquet first.
    pub async fn get_frame(&self, grid_id: &str) -> Result<LazyFrame, GridDataError> {
        let parquet_path = self.cache_path(grid_id);

        if fs::metadata(&parquet_path).await.is_ok() {
            info!("Cache hit for grid cell {} at {:?}", grid_id, parquet_path);
        } else {
            warn!(
                "Cache miss for grid cell {}. Downloading and processing.",
                grid_id
            );
            let raw_bytes = self.download(grid_id).await?;
            let df = Self::csv_to_dataframe(raw_bytes, grid_id).await?;

            fs::create_dir_all(&self.cache_dir)
                .await
                .map_err(|e| GridDataError::CacheDirCreation(self.cache_dir.clone(), e))?;

            Self::cache_dataframe(df, &parquet_path).await?;
            info!("Cached grid cell {} to {:?}", grid_id, parquet_path);
        }

        LazyFrame::scan_parquet(&parquet_path, Default::default())
            .map_err(|e| GridDataError::ParquetScan(parquet_path.clone(), e))
    }

    async fn download(&self, grid_id: &str) -> Result<Vec<u8>, GridDataError> {
        let url = format!("{}/{}/{}.csv.gz", self.base_url, CELL_DATA_PATH, grid_id);
        info!("Downloading data from {}", url);

        let response = self
            .download_client
            .get(&url)
            .send()
            .await
            .map_err(|e| GridDataError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    GridDataError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    GridDataError::NetworkRequest(url, e)
                });
            }
        };

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        let stream_reader = StreamReader::new(stream);
        let mut decoder = GzipDecoder::new(stream_reader);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .await
            .map_err(GridDataError::DownloadIo)?;
        info!(
            "Downloaded and decompressed {} bytes for grid cell {}",
            decompressed.len(),
            grid_id
        );
        Ok(decompressed)
    }

    /// Parses headered CSV bytes into a DataFrame on a blocking task and checks
    /// that every basic-dataset column is present.
    pub(crate) async fn csv_to_dataframe(
        bytes: Vec<u8>,
        grid_id: &str,
    ) -> Result<DataFrame, GridDataError> {
        let grid_id = grid_id.to_string();

        task::spawn_blocking(move || {
            let io_err = |e| GridDataError::CsvReadIo {
                grid_id: grid_id.clone(),
                source: e,
            };
            let mut temp_file = NamedTempFile::new().map_err(io_err)?;
            temp_file.write_all(&bytes).map_err(io_err)?;
            temp_file.flush().map_err(io_err)?;

            let polars_err = |e| GridDataError::CsvReadPolars {
                grid_id: grid_id.clone(),
                source: e,
            };
            let df = CsvReadOptions::default()
                .with_has_header(true)
                .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
                .map_err(polars_err)?
                .finish()
                .map_err(polars_err)?;

            let required = std::iter::once(COL_DATE)
                .chain(Variable::ALL.into_iter().map(Variable::column_name));
            for column in required {
                if df.column(column).is_err() {
                    warn!("CSV for grid cell {} lacks column {}", grid_id, column);
                    return Err(GridDataError::MissingColumn {
                        grid_id: grid_id.clone(),
                        column: column.to_string(),
                    });
                }
            }
            Ok(df)
        })
        .await?
    }

    /// Writes a DataFrame to a Snappy-compressed parquet file on a blocking task.
    ///
    /// The file is written next to its destination and renamed into place, so
    /// a concurrent reader (or a second request missing the same cell) never
    /// sees a partial file.
    pub(crate) async fn cache_dataframe(
        mut df: DataFrame,
        path: &Path,
    ) -> Result<(), GridDataError> {
        let path_buf = path.to_path_buf();
        task::spawn_blocking(move || {
            let io_err = |e| GridDataError::ParquetWriteIo(path_buf.clone(), e);
            let dir = path_buf
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let mut temp_file = NamedTempFile::new_in(dir).map_err(io_err)?;
            ParquetWriter::new(temp_file.as_file_mut())
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(|e| GridDataError::ParquetWritePolars(path_buf.clone(), e))?;
            temp_file
                .persist(&path_buf)
                .map_err(|e| io_err(e.error))?;
            Ok::<(), GridDataError>(())
        })
        .await??;
        Ok(())
    }
}
