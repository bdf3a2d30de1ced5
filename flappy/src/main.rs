//! Headless pipe-dodging demo for fixneat.
//!
//! `flappy train` evolves a population of birds and saves the best
//! one as a numbered model; `flappy play` runs a saved model.

mod models;
mod world;

use fixneat::logging::{EvolutionLogger, ReportingLevel};
use fixneat::{Population, PopulationConfig};
use fixneat_nn::genomics::{GeneticConfig, NNGenome};
use models::ModelInfo;
use world::{Bird, World, SENSOR_COUNT};

use chrono::Local;
use clap::{Parser, Subcommand};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use std::error::Error;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "flappy")]
#[command(about = "Evolve pipe-dodging birds with fixneat", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve a population and save its best bird
    Train {
        /// Population size, overriding the config file
        #[arg(short, long)]
        population: Option<NonZeroUsize>,

        /// Number of generations to run (0 = until interrupted)
        #[arg(short, long, default_value_t = 0)]
        generations: usize,

        /// RON file with population and genetic settings
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory models are saved to
        #[arg(short, long, default_value = "models")]
        models: PathBuf,

        /// Ticks after which a bird is retired (0 = never)
        #[arg(long, default_value_t = 10_000)]
        max_ticks: u64,

        /// Save the best bird every this many generations (0 = only at the end)
        #[arg(long, default_value_t = 50)]
        save_every: usize,
    },

    /// Run a saved model
    Play {
        /// Weights file; defaults to the latest model
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Directory searched for the latest model
        #[arg(long, default_value = "models")]
        models: PathBuf,

        /// Number of episodes to run
        #[arg(short, long, default_value_t = 1)]
        episodes: usize,

        /// Ticks after which an episode ends (0 = never)
        #[arg(long, default_value_t = 10_000)]
        max_ticks: u64,
    },
}

/// Settings read from a `--config` file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct TrainingConfig {
    population: PopulationConfig,
    genetic: GeneticConfig,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Train {
            population,
            generations,
            config,
            models: models_dir,
            max_ticks,
            save_every,
        } => {
            let mut training = match config {
                Some(path) => ron::from_str(&fs::read_to_string(path)?)?,
                None => TrainingConfig::default(),
            };
            if let Some(size) = population {
                training.population.size = size;
            }
            if training.genetic.input_count.get() != SENSOR_COUNT {
                return Err(format!(
                    "birds have {} sensors, but the genetic config asks for {} inputs",
                    SENSOR_COUNT, training.genetic.input_count
                )
                .into());
            }
            train(training, generations, &models_dir, max_ticks, save_every)
        }
        Commands::Play {
            model,
            models: models_dir,
            episodes,
            max_ticks,
        } => {
            let model = match model {
                Some(model) => model,
                None => models::list_models(&models_dir)?
                    .pop()
                    .map(|(_, path)| path)
                    .ok_or_else(|| format!("no models found in {}", models_dir.display()))?,
            };
            play(&model, episodes, max_ticks)
        }
    }
}

fn train(
    config: TrainingConfig,
    generations: usize,
    models_dir: &Path,
    max_ticks: u64,
    save_every: usize,
) -> Result<(), Box<dyn Error>> {
    let size = config.population.size.get();
    let mut population = Population::<_, NNGenome>::new(config.population, config.genetic);
    info!("training {} birds", size);

    loop {
        run_generation(&mut population, max_ticks);
        if let Err(e) = population.evolve() {
            warn!("{}; resetting population", e);
            population.reset();
            continue;
        }
        // A fresh logger per generation holds only the latest snapshot.
        let mut logger = EvolutionLogger::new(ReportingLevel::NoGenomes);
        logger.log(&population, &|i| [i.fitness()], ["lifespan"]);
        if let Some(log) = logger.iter().next() {
            info!(
                "generation {}: {} species, best {}, {}",
                log.generation_number,
                log.species_count,
                log.best_fitness,
                log.genome_stats
                    .first()
                    .map(|(name, stats)| format!("{} {}", name, stats))
                    .unwrap_or_default()
            );
        }

        let completed = completed_generations(&population);
        if generations > 0 && completed >= generations {
            break;
        }
        if save_every > 0 && completed % save_every == 0 {
            save_champion(&population, models_dir, generations)?;
        }
    }
    save_champion(&population, models_dir, generations)
}

/// Number of generations evaluated so far.
fn completed_generations(population: &Population<GeneticConfig, NNGenome>) -> usize {
    population.generation().saturating_sub(1)
}

/// Runs every bird of the current generation
/// through a shared world until all have died.
fn run_generation(population: &mut Population<GeneticConfig, NNGenome>, max_ticks: u64) {
    let mut world = World::new(StdRng::from_entropy());
    let mut birds = vec![Bird::new(); population.individuals().count()];
    while !population.is_extinct() {
        world.advance();
        let world = &world;
        population.par_step_live(&mut birds, |individual, bird| {
            let retired = max_ticks > 0 && individual.lifespan() >= max_ticks;
            if !retired && bird.step(individual.genome_mut(), world) {
                individual.tick();
            } else {
                individual.kill();
            }
        });
    }
}

fn save_champion(
    population: &Population<GeneticConfig, NNGenome>,
    models_dir: &Path,
    generation_limit: usize,
) -> Result<(), Box<dyn Error>> {
    match population.champion() {
        Ok((genome, fitness)) => {
            let info = ModelInfo {
                generation: completed_generations(population),
                fitness,
                created: Local::now(),
                population_size: population.config().size.get(),
                generation_limit,
            };
            models::save_model(models_dir, genome, &info)?;
        }
        Err(e) => warn!("nothing to save: {}", e),
    }
    Ok(())
}

fn play(model: &Path, episodes: usize, max_ticks: u64) -> Result<(), Box<dyn Error>> {
    let mut genome = NNGenome::new(&GeneticConfig::default());
    genome.load_weights(model)?;
    match models::summary(model) {
        Some(summary) => info!("playing {} ({})", model.display(), summary),
        None => info!("playing {}", model.display()),
    }

    for episode in 1..=episodes {
        let mut world = World::new(StdRng::from_entropy());
        let mut bird = Bird::new();
        let mut lifespan = 0;
        loop {
            world.advance();
            if !bird.step(&mut genome, &world) {
                break;
            }
            lifespan += 1;
            if max_ticks > 0 && lifespan >= max_ticks {
                break;
            }
        }
        info!("episode {}: lifespan {}", episode, lifespan);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses() {
        let config: TrainingConfig = ron::from_str(include_str!("../config.ron")).unwrap();
        assert_eq!(config.population.size.get(), 100);
        assert_eq!(config.genetic, GeneticConfig::default());
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: TrainingConfig = ron::from_str("(population: (size: 7, distance_threshold: 2.0, stagnation_threshold: 3))").unwrap();
        assert_eq!(config.population.size.get(), 7);
        assert_eq!(config.population.stagnation_threshold.get(), 3);
        assert_eq!(config.genetic, GeneticConfig::default());
    }

    #[test]
    fn cli_parses_train_flags() {
        let cli = Cli::parse_from(["flappy", "train", "-p", "20", "-g", "5", "--max-ticks", "0"]);
        match cli.command {
            Commands::Train {
                population,
                generations,
                max_ticks,
                ..
            } => {
                assert_eq!(population.map(NonZeroUsize::get), Some(20));
                assert_eq!(generations, 5);
                assert_eq!(max_ticks, 0);
            }
            Commands::Play { .. } => panic!("expected train command"),
        }
    }

    #[test]
    fn cli_rejects_empty_population() {
        assert!(Cli::try_parse_from(["flappy", "train", "-p", "0"]).is_err());
    }

    #[test]
    fn fresh_population_has_completed_nothing() {
        let mut population = Population::<_, NNGenome>::new(
            PopulationConfig::default(),
            GeneticConfig::default(),
        );
        assert_eq!(completed_generations(&population), 0);
        population.individuals_mut().for_each(|i| i.kill());
        population.evolve().unwrap();
        assert_eq!(completed_generations(&population), 1);
    }

    #[test]
    fn short_generation_run_saves_model() {
        let dir = std::env::temp_dir().join(format!("flappy-train-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let config = TrainingConfig {
            population: PopulationConfig {
                size: NonZeroUsize::new(10).unwrap(),
                ..PopulationConfig::default()
            },
            ..TrainingConfig::default()
        };
        train(config, 2, &dir, 300, 0).unwrap();

        let saved = models::list_models(&dir).unwrap();
        assert_eq!(saved.len(), 1);
        assert!(models::summary(&saved[0].1).unwrap().starts_with("Generation: 2"));
        play(&saved[0].1, 1, 300).unwrap();
        fs::remove_dir_all(&dir).unwrap();
    }
}
