//! Numbered model files: `model{n}.txt` holds a genome's
//! weights, and `model{n}_info.txt` describes how it was bred.

use fixneat_nn::genomics::NNGenome;

use chrono::{DateTime, Local};
use log::info;

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Training details saved alongside a model.
#[derive(Clone, Debug)]
pub struct ModelInfo {
    pub generation: usize,
    pub fitness: f32,
    pub created: DateTime<Local>,
    pub population_size: usize,
    /// 0 if training was unbounded.
    pub generation_limit: usize,
}

impl fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generation: {}", self.generation)?;
        writeln!(f, "Fitness: {}", self.fitness)?;
        writeln!(f, "Created: {}", self.created.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Population: {}", self.population_size)?;
        match self.generation_limit {
            0 => writeln!(f, "Generation limit: unbounded"),
            limit => writeln!(f, "Generation limit: {}", limit),
        }
    }
}

fn model_path(dir: &Path, number: usize) -> PathBuf {
    dir.join(format!("model{}.txt", number))
}

fn info_path(dir: &Path, number: usize) -> PathBuf {
    dir.join(format!("model{}_info.txt", number))
}

/// Returns the model files in `dir`, with their
/// numbers, in ascending order. A missing directory
/// holds no models.
pub fn list_models(dir: &Path) -> io::Result<Vec<(usize, PathBuf)>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(e),
    };

    let mut models = vec![];
    for entry in entries {
        let path = entry?.path();
        let number = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_prefix("model"))
            .and_then(|name| name.strip_suffix(".txt"))
            .and_then(|number| number.parse::<usize>().ok());
        if let Some(number) = number {
            models.push((number, path));
        }
    }
    models.sort();
    Ok(models)
}

/// Returns the lowest model number not yet taken in `dir`.
pub fn next_model_number(dir: &Path) -> usize {
    (1..)
        .find(|&n| !model_path(dir, n).exists())
        .unwrap_or(1)
}

/// Saves `genome` as the next numbered model in `dir`,
/// creating the directory if needed. Returns the path
/// of the weights file.
pub fn save_model(
    dir: &Path,
    genome: &NNGenome,
    info: &ModelInfo,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(dir)?;
    let number = next_model_number(dir);
    let path = model_path(dir, number);
    genome.save_weights(&path)?;
    fs::write(info_path(dir, number), info.to_string())?;
    info!(
        "saved model {} (generation {}, fitness {})",
        path.display(),
        info.generation,
        info.fitness
    );
    Ok(path)
}

/// Returns the generation and fitness lines of a
/// model's info file, if it has one.
pub fn summary(model: &Path) -> Option<String> {
    let stem = model.file_stem()?.to_str()?;
    let info = fs::read_to_string(model.with_file_name(format!("{}_info.txt", stem))).ok()?;
    let summary: Vec<&str> = info.lines().take(2).collect();
    Some(summary.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixneat_nn::genomics::GeneticConfig;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("flappy-{}-{}", std::process::id(), name));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn info() -> ModelInfo {
        ModelInfo {
            generation: 12,
            fitness: 345.0,
            created: Local::now(),
            population_size: 50,
            generation_limit: 0,
        }
    }

    #[test]
    fn models_are_numbered_consecutively() {
        let dir = scratch_dir("numbering");
        let genome = NNGenome::new(&GeneticConfig::default());
        let first = save_model(&dir, &genome, &info()).unwrap();
        let second = save_model(&dir, &genome, &info()).unwrap();

        assert_eq!(first, dir.join("model1.txt"));
        assert_eq!(second, dir.join("model2.txt"));
        assert!(dir.join("model2_info.txt").exists());
        assert_eq!(
            list_models(&dir).unwrap(),
            vec![(1, first), (2, second)]
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn gaps_are_filled() {
        let dir = scratch_dir("gaps");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("model2.txt"), "").unwrap();
        assert_eq!(next_model_number(&dir), 1);
        fs::write(dir.join("model1.txt"), "").unwrap();
        assert_eq!(next_model_number(&dir), 3);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn info_files_are_not_models() {
        let dir = scratch_dir("listing");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("model10.txt"), "").unwrap();
        fs::write(dir.join("model10_info.txt"), "").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();
        let numbers: Vec<usize> = list_models(&dir).unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(numbers, [10]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_lists_nothing() {
        assert!(list_models(&scratch_dir("absent")).unwrap().is_empty());
    }

    #[test]
    fn summary_reads_info() {
        let dir = scratch_dir("summary");
        let genome = NNGenome::new(&GeneticConfig::default());
        let path = save_model(&dir, &genome, &info()).unwrap();
        assert_eq!(
            summary(&path).unwrap(),
            "Generation: 12, Fitness: 345"
        );
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn info_lists_limit() {
        let text = ModelInfo {
            generation_limit: 300,
            ..info()
        }
        .to_string();
        assert!(text.ends_with("Generation limit: 300\n"));
        assert!(info().to_string().contains("unbounded"));
    }
}
