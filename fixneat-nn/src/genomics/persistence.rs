//! Plain-text weight files: one decimal weight
//! per line, in connection order.

use super::{NNGenome, WeightLoadError};

use log::debug;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

impl NNGenome {
    /// Writes the genome's weights, one per line.
    ///
    /// # Examples
    /// ```
    /// use fixneat_nn::genomics::{GeneticConfig, NNGenome};
    ///
    /// let mut genome = NNGenome::new(&GeneticConfig::default());
    /// genome.set_weights(&[0.5, -1.0, 0.25, 0.0]).unwrap();
    ///
    /// let mut out = vec![];
    /// genome.write_weights(&mut out).unwrap();
    /// assert_eq!(String::from_utf8(out).unwrap(), "0.5\n-1\n0.25\n0\n");
    /// ```
    pub fn write_weights<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for weight in self.weights() {
            writeln!(writer, "{}", weight)?;
        }
        writer.flush()
    }

    /// Reads one weight per line into the genome, replacing
    /// its weights in connection order. Surrounding whitespace
    /// is ignored; loaded weights are not clamped.
    ///
    /// # Errors
    /// Returns an error, leaving the genome untouched, if the
    /// number of lines differs from the number of connections,
    /// a line is not a number, or reading fails.
    ///
    /// # Examples
    /// ```
    /// use fixneat_nn::genomics::{GeneticConfig, NNGenome, WeightLoadError};
    ///
    /// let mut genome = NNGenome::new(&GeneticConfig::default());
    ///
    /// genome.read_weights("0.1\n0.2\n0.3\n0.4\n".as_bytes()).unwrap();
    /// assert_eq!(genome.weights().collect::<Vec<_>>(), [0.1, 0.2, 0.3, 0.4]);
    ///
    /// assert!(matches!(
    ///     genome.read_weights("0.1\n0.2\n".as_bytes()),
    ///     Err(WeightLoadError::ShapeMismatch { expected: 4, found: 2 })
    /// ));
    /// ```
    pub fn read_weights<R: BufRead>(&mut self, reader: R) -> Result<(), WeightLoadError> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        let expected = self.connections().count();
        if lines.len() != expected {
            return Err(WeightLoadError::ShapeMismatch {
                expected,
                found: lines.len(),
            });
        }

        let weights = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                line.trim()
                    .parse::<f32>()
                    .map_err(|source| WeightLoadError::Parse { line: i + 1, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.set_weights(&weights)
    }

    /// Saves the genome's weights to the file at `path`,
    /// creating or truncating it.
    pub fn save_weights(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        self.write_weights(BufWriter::new(File::create(path)?))?;
        debug!("saved weights to {}", path.display());
        Ok(())
    }

    /// Loads weights into the genome from the file at `path`.
    ///
    /// # Errors
    /// See [`read_weights`].
    ///
    /// [`read_weights`]: NNGenome::read_weights
    pub fn load_weights(&mut self, path: impl AsRef<Path>) -> Result<(), WeightLoadError> {
        let path = path.as_ref();
        self.read_weights(BufReader::new(File::open(path)?))?;
        debug!("loaded weights from {}", path.display());
        Ok(())
    }
}
