use std::ffi::OsStr;
use std::fs::File;
use std::str::FromStr;

use justconfig::item::ValueExtractor;
use justconfig::processors::Trim;
use justconfig::sources::env::Env;
use justconfig::sources::text::ConfigText;
use justconfig::ConfPath;
use justconfig::Config;

use crate::config_processors::Unquote;
use crate::error::{RatingsError, Result};
use crate::io::UserId;

// Set some default values
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_SPLIT_WEIGHTS: &str = "6,2,2";
const DEFAULT_SPLIT_SEED: u64 = 0;
const DEFAULT_MOVIE_DAMPING: usize = 25;
const DEFAULT_USER_DAMPING: usize = 10;
const DEFAULT_NUM_TOP_MOVIES: usize = 20;
const DEFAULT_MIN_SUPPORT: usize = 500;
const DEFAULT_RECOMMEND_USER_ID: UserId = 0;
const DEFAULT_NUM_RECOMMENDATIONS: usize = 20;
const DEFAULT_RECOMMEND_MIN_SUPPORT: usize = 75;
const DEFAULT_MOVIE_DAMPING_CHOICES: &str = "0,5,10,25,50,100";
const DEFAULT_USER_DAMPING_CHOICES: &str = "0,5,10,25,50";

pub struct AppConfig {
    pub log: LogConfig,
    pub compute: ComputeConfig,
    pub data: DataConfig,
    pub split: SplitConfig,
    pub model: ModelConfig,
    pub ranking: RankingConfig,
    pub recommend: RecommendConfig,
    pub hyperparam: HyperparamConfig,
}

pub struct LogConfig {
    pub level: String,
}

pub struct ComputeConfig {
    pub num_workers: usize,
}

pub struct DataConfig {
    pub ratings_path: Option<String>,
    pub movies_path: Option<String>,
    pub predictions_path: Option<String>,
    pub my_ratings_path: Option<String>,
}

pub struct SplitConfig {
    pub weights: Vec<f64>,
    pub seed: u64,
}

pub struct ModelConfig {
    pub movie_damping: usize,
    pub user_damping: usize,
}

pub struct RankingConfig {
    pub num_top_movies: usize,
    pub min_support: usize,
}

pub struct RecommendConfig {
    pub user_id: UserId,
    pub num_recommendations: usize,
    pub min_support: usize,
    pub predictions_out_path: Option<String>,
}

pub struct HyperparamConfig {
    /// Zero searches the whole grid, otherwise this many random combinations.
    pub num_iterations: usize,
    pub movie_damping_choices: Vec<usize>,
    pub user_damping_choices: Vec<usize>,
    pub save_records: bool,
    pub out_path: String,
}

impl AppConfig {
    pub fn new(config_path: String) -> Result<AppConfig> {
        // Initialize config object
        let mut conf = Config::default();

        // Check if there is a config file
        if let Ok(config_file) = File::open(&config_path) {
            let config_text = ConfigText::new(config_file, &config_path)
                .map_err(|error| RatingsError::Config(error.to_string()))?;
            conf.add_source(config_text);
        }

        // Define config params from environment variables
        let config_env = Env::new(&[
            (
                ConfPath::from(&["data", "ratings_path"]),
                OsStr::new("RATINGS_DATA"),
            ),
            (
                ConfPath::from(&["data", "movies_path"]),
                OsStr::new("MOVIES_DATA"),
            ),
            (
                ConfPath::from(&["data", "predictions_path"]),
                OsStr::new("PREDICTIONS_DATA"),
            ),
            (ConfPath::from(&["log", "level"]), OsStr::new("LOG_LEVEL")),
        ]);
        conf.add_source(config_env);

        // Parse into custom config struct
        AppConfig::parse(conf)
    }

    fn parse(conf: Config) -> Result<AppConfig> {
        Ok(AppConfig {
            log: LogConfig::parse(&conf, ConfPath::from(&["log"])),
            compute: ComputeConfig::parse(&conf, ConfPath::from(&["compute"])),
            data: DataConfig::parse(&conf, ConfPath::from(&["data"])),
            split: SplitConfig::parse(&conf, ConfPath::from(&["split"]))?,
            model: ModelConfig::parse(&conf, ConfPath::from(&["model"])),
            ranking: RankingConfig::parse(&conf, ConfPath::from(&["ranking"])),
            recommend: RecommendConfig::parse(&conf, ConfPath::from(&["recommend"])),
            hyperparam: HyperparamConfig::parse(&conf, ConfPath::from(&["hyperparam"]))?,
        })
    }
}

/// Parses a comma separated list such as `6,2,2`.
pub fn parse_list<T: FromStr>(raw: &str, name: &str) -> Result<Vec<T>> {
    raw.split(',')
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(|value| {
            value.parse::<T>().map_err(|_| {
                RatingsError::Config(format!("invalid value {:?} in {}", value, name))
            })
        })
        .collect()
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| RatingsError::Config(format!("{} is not configured", name)))
}

impl LogConfig {
    fn parse(conf: &Config, path: ConfPath) -> LogConfig {
        LogConfig {
            level: conf
                .get(path.push("level"))
                .unquote()
                .value()
                .unwrap_or_else(|_| String::from(DEFAULT_LOG_LEVEL)),
        }
    }
}

impl ComputeConfig {
    fn parse(conf: &Config, path: ConfPath) -> ComputeConfig {
        ComputeConfig {
            num_workers: conf
                .get(path.push("num_workers"))
                .trim()
                .value()
                // Detect number of CPUs
                .unwrap_or_else(|_| sys_info::cpu_num().map(|cpus| cpus as usize).unwrap_or(1))
                .max(1),
        }
    }
}

impl DataConfig {
    fn parse(conf: &Config, path: ConfPath) -> DataConfig {
        DataConfig {
            ratings_path: conf.get(path.push("ratings_path")).unquote().value().ok(),
            movies_path: conf.get(path.push("movies_path")).unquote().value().ok(),
            predictions_path: conf.get(path.push("predictions_path")).unquote().value().ok(),
            my_ratings_path: conf.get(path.push("my_ratings_path")).unquote().value().ok(),
        }
    }

    pub fn ratings_path(&self) -> Result<&str> {
        required(&self.ratings_path, "data.ratings_path")
    }

    pub fn movies_path(&self) -> Result<&str> {
        required(&self.movies_path, "data.movies_path")
    }

    pub fn predictions_path(&self) -> Result<&str> {
        required(&self.predictions_path, "data.predictions_path")
    }

    pub fn my_ratings_path(&self) -> Result<&str> {
        required(&self.my_ratings_path, "data.my_ratings_path")
    }
}

impl SplitConfig {
    fn parse(conf: &Config, path: ConfPath) -> Result<SplitConfig> {
        let raw_weights: String = conf
            .get(path.push("weights"))
            .unquote()
            .value()
            .unwrap_or_else(|_| String::from(DEFAULT_SPLIT_WEIGHTS));
        Ok(SplitConfig {
            weights: parse_list(&raw_weights, "split.weights")?,
            seed: conf
                .get(path.push("seed"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_SPLIT_SEED),
        })
    }
}

impl ModelConfig {
    fn parse(conf: &Config, path: ConfPath) -> ModelConfig {
        ModelConfig {
            movie_damping: conf
                .get(path.push("movie_damping"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_MOVIE_DAMPING),
            user_damping: conf
                .get(path.push("user_damping"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_USER_DAMPING),
        }
    }
}

impl RankingConfig {
    fn parse(conf: &Config, path: ConfPath) -> RankingConfig {
        RankingConfig {
            num_top_movies: conf
                .get(path.push("num_top_movies"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_NUM_TOP_MOVIES),
            min_support: conf
                .get(path.push("min_support"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_MIN_SUPPORT),
        }
    }
}

impl RecommendConfig {
    fn parse(conf: &Config, path: ConfPath) -> RecommendConfig {
        RecommendConfig {
            user_id: conf
                .get(path.push("user_id"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_RECOMMEND_USER_ID),
            num_recommendations: conf
                .get(path.push("num_recommendations"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_NUM_RECOMMENDATIONS),
            min_support: conf
                .get(path.push("min_support"))
                .trim()
                .value()
                .unwrap_or(DEFAULT_RECOMMEND_MIN_SUPPORT),
            predictions_out_path: conf
                .get(path.push("predictions_out_path"))
                .unquote()
                .value()
                .ok(),
        }
    }
}

impl HyperparamConfig {
    fn parse(conf: &Config, path: ConfPath) -> Result<HyperparamConfig> {
        let movie_damping_choices: String = conf
            .get(path.push("movie_damping_choices"))
            .unquote()
            .value()
            .unwrap_or_else(|_| String::from(DEFAULT_MOVIE_DAMPING_CHOICES));
        let user_damping_choices: String = conf
            .get(path.push("user_damping_choices"))
            .unquote()
            .value()
            .unwrap_or_else(|_| String::from(DEFAULT_USER_DAMPING_CHOICES));
        Ok(HyperparamConfig {
            num_iterations: conf
                .get(path.push("num_iterations"))
                .trim()
                .value()
                .unwrap_or(0),
            movie_damping_choices: parse_list(
                &movie_damping_choices,
                "hyperparam.movie_damping_choices",
            )?,
            user_damping_choices: parse_list(
                &user_damping_choices,
                "hyperparam.user_damping_choices",
            )?,
            save_records: conf
                .get(path.push("save_records"))
                .trim()
                .value()
                .unwrap_or(false),
            out_path: conf
                .get(path.push("out_path"))
                .unquote()
                .value()
                .unwrap_or_else(|_| String::from("grid_search_records.csv")),
        })
    }
}

#[cfg(test)]
mod config_test {
    use super::*;
    use std::io::Write;

    fn config_from(content: &str) -> AppConfig {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        AppConfig::new(file.path().to_string_lossy().to_string()).unwrap()
    }

    #[test]
    fn should_fall_back_to_defaults() {
        let config = config_from("");
        assert_eq!(vec![6.0, 2.0, 2.0], config.split.weights);
        assert_eq!(0, config.split.seed);
        assert_eq!(20, config.ranking.num_top_movies);
        assert_eq!(500, config.ranking.min_support);
        assert_eq!(75, config.recommend.min_support);
        assert_eq!(vec![0, 5, 10, 25, 50, 100], config.hyperparam.movie_damping_choices);
        assert!(!config.hyperparam.save_records);
        assert_eq!(0, config.hyperparam.num_iterations);
        assert!(config.compute.num_workers >= 1);
        assert!(config.data.my_ratings_path().is_err());
    }

    #[test]
    fn should_read_values_from_file() {
        let config = config_from(
            "[data]\n\
             movies_path = \"movies.dat\"\n\
             [split]\n\
             weights = \"8,1,1\"\n\
             seed = 7\n\
             [model]\n\
             movie_damping = 3\n\
             [hyperparam]\n\
             num_iterations = 4\n\
             user_damping_choices = \"1, 2\"\n\
             save_records = true\n",
        );
        assert_eq!("movies.dat", config.data.movies_path().unwrap());
        assert_eq!(vec![8.0, 1.0, 1.0], config.split.weights);
        assert_eq!(7, config.split.seed);
        assert_eq!(3, config.model.movie_damping);
        assert_eq!(4, config.hyperparam.num_iterations);
        assert_eq!(vec![1, 2], config.hyperparam.user_damping_choices);
        assert!(config.hyperparam.save_records);
    }

    #[test]
    fn should_parse_lists() {
        assert_eq!(vec![1, 2, 3], parse_list::<usize>("1, 2,3,", "x").unwrap());
        assert!(parse_list::<usize>("1,two", "x").is_err());
    }
}
