//! Startup load phase
//!
//! Every input file is read before the router exists. A missing or malformed
//! file aborts startup; there is no partially loaded dashboard.

use std::path::PathBuf;
use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use songscope_common::config::DashboardConfig;
use songscope_common::genre::GenreNormalizer;
use songscope_common::label::{DisplayLabel, LabelIndex};
use songscope_common::matrix::{parse_matrix, CorrelationCell};
use songscope_common::sampler::shuffle_take;
use songscope_common::songs::{parse_songs, SongRecord};
use songscope_common::{Error, Result};

/// Genre column of the pre-computed popularity correlation file
const POPULARITY_GENRE_COLUMN: &str = "Genre";
/// Dropdown entry that shows every genre
const ALL_GENRES: &str = "All";

/// Raw text of every input file
#[derive(Debug, Clone)]
pub struct DataSources {
    pub matrix: String,
    pub songs: String,
    pub comparisons: Option<ComparisonSources>,
}

/// Raw text of the comparison chart inputs
#[derive(Debug, Clone)]
pub struct ComparisonSources {
    pub explicit: String,
    pub non_explicit: String,
    pub popularity_correlation: String,
    pub artist_stats: String,
}

/// Data behind the comparison charts
#[derive(Debug, Clone)]
pub struct Comparisons {
    /// Explicit sample followed by the non-explicit sample
    pub explicit_sample: Vec<SongRecord>,
    /// Popularity dropdown options, "All" first
    pub popularity_genres: Vec<String>,
    /// Served as-is under `/data/`
    pub popularity_csv: String,
    pub artist_stats_csv: String,
}

/// Everything loaded at startup; immutable afterwards
#[derive(Debug, Clone)]
pub struct Dataset {
    pub index: Arc<LabelIndex>,
    pub cells: Arc<Vec<CorrelationCell>>,
    pub songs: Arc<Vec<SongRecord>>,
    pub comparisons: Option<Arc<Comparisons>>,
}

impl Dataset {
    /// Heatmap labels in header order
    pub fn labels(&self) -> &[DisplayLabel] {
        self.index.labels()
    }

    /// Parse already-read sources
    pub fn build<R: Rng + ?Sized>(
        sources: DataSources,
        config: &DashboardConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let matrix = parse_matrix(&sources.matrix)?;
        let mut songs = parse_songs(&sources.songs)?;

        if config.normalize_genres {
            let normalizer = match &config.allowed_genres {
                Some(allowed) => GenreNormalizer::new(allowed),
                None => GenreNormalizer::default(),
            };
            let other = normalizer.apply(&mut songs);
            info!("Genre normalization: {} of {} songs mapped to Other", other, songs.len());
        }

        for field in matrix.index.field_ids() {
            if !songs.iter().any(|s| s.finite(field).is_some()) {
                warn!("No song has a numeric '{}' value; its scatter plots will be empty", field);
            }
        }

        let comparisons = sources
            .comparisons
            .map(|c| build_comparisons(c, config.comparison_sample_size, rng))
            .transpose()?
            .map(Arc::new);

        info!(
            "Loaded {} labels, {} heatmap cells, {} songs{}",
            matrix.index.len(),
            matrix.cells.len(),
            songs.len(),
            if comparisons.is_some() { ", comparison charts enabled" } else { "" }
        );

        Ok(Dataset {
            index: Arc::new(matrix.index),
            cells: Arc::new(matrix.cells),
            songs: Arc::new(songs),
            comparisons,
        })
    }

    /// Read all configured files concurrently, then parse them
    pub async fn load<R: Rng + ?Sized>(config: &DashboardConfig, rng: &mut R) -> Result<Self> {
        let files = &config.files;
        let (matrix, songs) = tokio::try_join!(
            read_text(config.data_path(&files.correlation)),
            read_text(config.data_path(&files.songs)),
        )?;

        let comparisons = if config.comparisons {
            let (explicit, non_explicit, popularity_correlation, artist_stats) = tokio::try_join!(
                read_text(config.data_path(&files.explicit)),
                read_text(config.data_path(&files.non_explicit)),
                read_text(config.data_path(&files.popularity_correlation)),
                read_text(config.data_path(&files.artist_stats)),
            )?;
            Some(ComparisonSources {
                explicit,
                non_explicit,
                popularity_correlation,
                artist_stats,
            })
        } else {
            None
        };

        Self::build(
            DataSources {
                matrix,
                songs,
                comparisons,
            },
            config,
            rng,
        )
    }
}

async fn read_text(path: PathBuf) -> Result<String> {
    tokio::fs::read_to_string(&path).await.map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}

fn build_comparisons<R: Rng + ?Sized>(
    sources: ComparisonSources,
    sample_size: usize,
    rng: &mut R,
) -> Result<Comparisons> {
    let explicit = parse_songs(&sources.explicit)?;
    let non_explicit = parse_songs(&sources.non_explicit)?;

    let mut explicit_sample = shuffle_take(explicit, sample_size, rng);
    explicit_sample.extend(shuffle_take(non_explicit, sample_size, rng));

    let popularity_genres = popularity_genres(&sources.popularity_correlation)?;

    Ok(Comparisons {
        explicit_sample,
        popularity_genres,
        popularity_csv: sources.popularity_correlation,
        artist_stats_csv: sources.artist_stats,
    })
}

/// "All" followed by every other genre in first-seen order
fn popularity_genres(csv_text: &str) -> Result<Vec<String>> {
    let rows = parse_songs(csv_text)?;
    let mut genres = vec![ALL_GENRES.to_string()];

    for row in &rows {
        let genre = match row.get(POPULARITY_GENRE_COLUMN).and_then(|v| v.as_str()) {
            Some(g) => g,
            None => continue,
        };
        if !genres.iter().any(|g| g == genre) {
            genres.push(genre.to_string());
        }
    }

    Ok(genres)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const MATRIX: &str = ",energy,tempo\nenergy,1,0.3\ntempo,0.3,1\n";
    const SONGS: &str = "track_name,track_genre,energy,tempo\nA,Jazz,0.5,100\nB,polka,0.6,\n";

    fn sources(comparisons: Option<ComparisonSources>) -> DataSources {
        DataSources {
            matrix: MATRIX.to_string(),
            songs: SONGS.to_string(),
            comparisons,
        }
    }

    #[test]
    fn test_build_core_dataset() {
        let config = DashboardConfig::default();
        let dataset = Dataset::build(sources(None), &config, &mut StdRng::seed_from_u64(1)).unwrap();

        assert_eq!(dataset.labels(), &["Energy", "Tempo"]);
        assert_eq!(dataset.cells.len(), 4);
        assert_eq!(dataset.songs.len(), 2);
        assert!(dataset.comparisons.is_none());
        // genres untouched unless normalization is on
        assert_eq!(dataset.songs[1].genre(), Some("polka"));
    }

    #[test]
    fn test_build_normalizes_genres_when_enabled() {
        let config = DashboardConfig {
            normalize_genres: true,
            ..Default::default()
        };
        let dataset = Dataset::build(sources(None), &config, &mut StdRng::seed_from_u64(1)).unwrap();

        assert_eq!(dataset.songs[0].genre(), Some("Jazz"));
        assert_eq!(dataset.songs[1].genre(), Some("Other"));
    }

    #[test]
    fn test_malformed_matrix_aborts_build() {
        let mut bad = sources(None);
        bad.matrix = ",energy,tempo\nenergy,1\n".to_string();
        let result = Dataset::build(bad, &DashboardConfig::default(), &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(Error::MalformedMatrix(_))));
    }

    #[test]
    fn test_comparisons_sample_each_group() {
        let explicit: String = std::iter::once("track_name,explicit,popularity\n".to_string())
            .chain((0..10).map(|i| format!("e{},True,{}\n", i, i)))
            .collect();
        let non_explicit: String = std::iter::once("track_name,explicit,popularity\n".to_string())
            .chain((0..3).map(|i| format!("n{},False,{}\n", i, i)))
            .collect();
        let comparisons = ComparisonSources {
            explicit,
            non_explicit,
            popularity_correlation: ",Metric,Correlation,Genre\n0,energy,0.1,All\n1,energy,0.2,pop\n2,tempo,0.0,pop\n3,tempo,0.1,rock\n".to_string(),
            artist_stats: "artist,duration,tempo,loudness\nA,3.5,120,-5\n".to_string(),
        };
        let config = DashboardConfig {
            comparison_sample_size: 4,
            ..Default::default()
        };

        let dataset = Dataset::build(sources(Some(comparisons)), &config, &mut StdRng::seed_from_u64(2)).unwrap();
        let comparisons = dataset.comparisons.unwrap();

        assert_eq!(comparisons.explicit_sample.len(), 7);
        assert!(comparisons.explicit_sample[..4]
            .iter()
            .all(|s| s.track_name().unwrap().starts_with('e')));
        assert_eq!(comparisons.popularity_genres, vec!["All", "pop", "rock"]);
        assert!(comparisons.artist_stats_csv.starts_with("artist,"));
    }

    #[tokio::test]
    async fn test_load_reads_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("corr10.csv"), MATRIX).unwrap();
        std::fs::write(dir.path().join("song.csv"), SONGS).unwrap();
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            comparisons: false,
            ..Default::default()
        };

        let dataset = Dataset::load(&config, &mut StdRng::seed_from_u64(3)).await.unwrap();

        assert_eq!(dataset.songs.len(), 2);
    }

    #[tokio::test]
    async fn test_load_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("corr10.csv"), MATRIX).unwrap();
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            comparisons: false,
            ..Default::default()
        };

        let result = Dataset::load(&config, &mut StdRng::seed_from_u64(3)).await;

        match result {
            Err(Error::Io(e)) => assert!(e.to_string().contains("song.csv")),
            other => panic!("expected Io error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_load_requires_comparison_files_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("corr10.csv"), MATRIX).unwrap();
        std::fs::write(dir.path().join("song.csv"), SONGS).unwrap();
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            comparisons: true,
            ..Default::default()
        };

        let result = Dataset::load(&config, &mut StdRng::seed_from_u64(3)).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
