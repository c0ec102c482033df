use crate::grid_data::error::GridDataError;
use crate::types::coordinates::LatLon;
use crate::types::grid_point::GridPoint;
use async_compression::tokio::bufread::GzipDecoder;
use bincode::config::{Configuration, Fixint, LittleEndian};
use futures_util::TryStreamExt;
use log::info;
use reqwest::Client;
use rstar::RTree;
use std::cmp::Ordering;
use std::io;
use std::path::Path;
use tokio::io::{AsyncReadExt, BufReader};
use tokio_util::io::StreamReader;

/// Path of the gzipped JSON grid catalogue, relative to the mirror base URL.
pub const CATALOGUE_PATH: &str = "grid/points.json.gz";
pub const BINCODE_CACHE_FILE_NAME: &str = "grid_points.bin";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

/// Nearest-neighbour index over the grid catalogue.
#[derive(Debug, Clone)]
pub struct GridLocator {
    rtree: RTree<GridPoint>,
}

impl GridLocator {
    /// Loads the catalogue from the bincode cache in `cache_dir`, downloading
    /// it from `base_url` first when the cache file is missing.
    pub async fn new(cache_dir: &Path, base_url: &str) -> Result<Self, GridDataError> {
        let cache_file = cache_dir.join(BINCODE_CACHE_FILE_NAME);

        let points: Vec<GridPoint> = if cache_file.exists() {
            let path_clone = cache_file.clone();
            tokio::task::spawn_blocking(move || Self::get_cached_points(&path_clone)).await??
        } else {
            let url = format!("{}/{}", base_url.trim_end_matches('/'), CATALOGUE_PATH);
            info!("Grid catalogue cache not found. Fetching from URL: {}", url);
            let points = Self::fetch_points(&url).await?;
            Self::cache_points(points.clone(), &cache_file).await?;
            points
        };

        Ok(Self::from_points(points))
    }

    pub fn from_points(points: Vec<GridPoint>) -> Self {
        GridLocator {
            rtree: RTree::bulk_load(points),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    /// Looks up a grid point by id.
    pub fn get(&self, id: &str) -> Option<&GridPoint> {
        self.rtree.iter().find(|p| p.id == id)
    }

    fn get_cached_points(cache_path: &Path) -> Result<Vec<GridPoint>, GridDataError> {
        let bytes = std::fs::read(cache_path)
            .map_err(|e| GridDataError::CacheRead(cache_path.to_path_buf(), e))?;
        let (decoded, _) =
            bincode::serde::decode_from_slice::<Vec<GridPoint>, _>(&bytes, BINCODE_CONFIG)
                .map_err(|e| GridDataError::CacheDecode(cache_path.to_path_buf(), Box::from(e)))?;
        Ok(decoded)
    }

    async fn fetch_points(url: &str) -> Result<Vec<GridPoint>, GridDataError> {
        let client = Client::new();
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| GridDataError::NetworkRequest(url.to_string(), e))?;
        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(match e.status() {
                    Some(status) => GridDataError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    },
                    None => GridDataError::NetworkRequest(url.to_string(), e),
                });
            }
        };
        let stream = response.bytes_stream().map_err(io::Error::other);
        let stream_reader = StreamReader::new(stream);
        let gzip_decoder = GzipDecoder::new(BufReader::new(stream_reader));
        let mut decoder_reader = BufReader::new(gzip_decoder);
        let mut decompressed_json = Vec::new();
        decoder_reader.read_to_end(&mut decompressed_json).await?;
        let parse_start = std::time::Instant::now();
        let points = tokio::task::spawn_blocking(move || {
            serde_json::from_slice::<Vec<GridPoint>>(&decompressed_json)
                .map_err(GridDataError::from)
        })
        .await??;
        info!(
            "Parsed {} grid points from JSON in {:?}",
            points.len(),
            parse_start.elapsed()
        );
        Ok(points)
    }

    pub(crate) async fn cache_points(
        points: Vec<GridPoint>,
        cache_path: &Path,
    ) -> Result<(), GridDataError> {
        let bincode_data = tokio::task::spawn_blocking(move || {
            bincode::serde::encode_to_vec(points, BINCODE_CONFIG)
                .map_err(|e| GridDataError::CacheEncode(Box::new(e)))
        })
        .await??;
        tokio::fs::write(cache_path, &bincode_data)
            .await
            .map_err(|e| GridDataError::CacheWrite(cache_path.to_path_buf(), e))?;
        info!(
            "Serialized and wrote grid catalogue cache ({} bytes) to {}",
            bincode_data.len(),
            cache_path.display()
        );
        Ok(())
    }

    /// Up to `n` grid points closest to `target`, nearest first, with their
    /// great-circle distance in kilometres.
    pub fn nearest(&self, target: LatLon, n: usize) -> Vec<(GridPoint, f64)> {
        if n == 0 {
            return vec![];
        }
        let query_point = [target.latitude(), target.longitude()];

        // Degree-space ordering differs from great-circle ordering away from
        // the equator, so take a margin of candidates before re-sorting.
        let candidate_limit = (n * 2).max(16);

        let mut with_distance: Vec<(GridPoint, f64)> = self
            .rtree
            .nearest_neighbor_iter(&query_point)
            .take(candidate_limit)
            .map(|p| (p.clone(), p.distance_km(target)))
            .collect();

        with_distance.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });
        with_distance.truncate(n);
        with_distance
    }
}
