use std::path::Path;

use tracing::{info, warn};

use crate::data::csv::{split_positional, PositionalSchema};
use crate::data::features::{encode, FeatureVector};
use crate::error::{Result, TitanicError};
use crate::eval::accuracy::argmax;
use crate::inference::predictor::Predictor;
use crate::math::matrix::Matrix;

/// Written when no class probability is above zero.
pub const UNKNOWN_CLASS: usize = 7;

pub const SUBMISSION_HEADER: &str = "PassengerId,Survived";

/// Turns a positional passenger file into a `PassengerId,Survived`
/// submission, one single-row prediction per passenger.
pub struct InferenceDriver<'a, P: Predictor + ?Sized> {
    predictor: &'a P,
    schema: PositionalSchema,
}

impl<'a, P: Predictor + ?Sized> InferenceDriver<'a, P> {
    pub fn new(predictor: &'a P) -> Self {
        InferenceDriver { predictor, schema: PositionalSchema::TITANIC }
    }

    pub fn with_schema(predictor: &'a P, schema: PositionalSchema) -> Self {
        InferenceDriver { predictor, schema }
    }

    /// Predicted class of one passenger, or `UNKNOWN_CLASS`.
    pub fn predict_sample(&self, features: &FeatureVector) -> Result<usize> {
        let output = self.predictor.predict(&Matrix::row_vector(features.as_slice()))?;
        if output.rows != 1 {
            return Err(TitanicError::shape("1 output row", format!("{} output rows", output.rows)));
        }
        Ok(argmax(output.row(0)).unwrap_or(UNKNOWN_CLASS))
    }

    /// Builds the submission text for `text`. `path` only labels errors.
    /// Returns the text and the number of passenger rows in it.
    pub fn render(&self, text: &str, path: &Path) -> Result<(String, usize)> {
        let mut lines: Vec<&str> = text.split('\n').collect();
        if lines.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
            lines.pop();
        }
        if lines.is_empty() {
            return Err(TitanicError::EmptyDataset { path: path.to_path_buf() });
        }

        let width = self.schema.width();
        let mut output = String::from(SUBMISSION_HEADER);
        output.push('\n');

        for (line_idx, line) in lines.iter().enumerate().skip(1) {
            let row = line_idx + 1;
            let cells = split_positional(line);
            if cells.len() < width {
                return Err(TitanicError::MalformedRow {
                    path: path.to_path_buf(),
                    row,
                    reason: format!("expected at least {width} cells, found {}", cells.len()),
                });
            }

            let record = self.schema.raw(&cells).parse(path, row)?;
            let id = cells[self.schema.id];
            let predicted = self.predict_sample(&encode(&record))?;
            if predicted == UNKNOWN_CLASS {
                warn!(passenger = id, row, "no class scored above zero");
            }

            output.push_str(&format!("{id},{predicted}\n"));
        }

        Ok((output, lines.len() - 1))
    }

    /// Reads `input`, predicts every row and overwrites `output`.
    pub fn run(&self, input: &Path, output: &Path) -> Result<usize> {
        let text = std::fs::read_to_string(input).map_err(|e| TitanicError::io(input, e))?;
        let (submission, rows) = self.render(&text, input)?;
        std::fs::write(output, submission).map_err(|e| TitanicError::io(output, e))?;
        info!(rows, output = %output.display(), "submission written");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns the same probability row for every input.
    struct Fixed(Vec<f64>);

    impl Predictor for Fixed {
        fn num_classes(&self) -> usize {
            self.0.len()
        }

        fn predict(&self, inputs: &Matrix) -> Result<Matrix> {
            let rows = vec![self.0.clone(); inputs.rows];
            Ok(Matrix::from_rows(&rows).unwrap_or_default())
        }
    }

    const FILE: &str = "PassengerId,Pclass,Name,Sex,Age,SibSp,Parch,Ticket,Fare,Cabin,Embarked\n\
                        892,3,\"Kelly, Mr. James\",male,34.5,0,0,330911,7.8292,,Q\n\
                        893,3,\"Wilkes, Mrs. James (Ellen Needs)\",female,,1,0,363272,7,,S\n";

    #[test]
    fn predicts_argmax_per_row() {
        let stub = Fixed(vec![0.2, 0.8]);
        let (out, rows) = InferenceDriver::new(&stub).render(FILE, Path::new("fintest.csv")).unwrap();
        assert_eq!(rows, 2);
        assert_eq!(out, "PassengerId,Survived\n892,1\n893,1\n");
    }

    #[test]
    fn all_zero_probabilities_fall_back_to_sentinel() {
        let stub = Fixed(vec![0.0, 0.0]);
        let (out, _) = InferenceDriver::new(&stub).render(FILE, Path::new("fintest.csv")).unwrap();
        assert_eq!(out, format!("PassengerId,Survived\n892,{UNKNOWN_CLASS}\n893,{UNKNOWN_CLASS}\n"));
    }

    #[test]
    fn missing_trailing_newline_keeps_last_row() {
        let stub = Fixed(vec![0.9, 0.1]);
        let text = FILE.trim_end();
        let (out, rows) = InferenceDriver::new(&stub).render(text, Path::new("f.csv")).unwrap();
        assert_eq!(rows, 2);
        assert!(out.ends_with("893,0\n"));
    }

    #[test]
    fn custom_schema_reads_compact_rows() {
        let schema = PositionalSchema {
            id: 0,
            class: 1,
            sex: 2,
            age: 3,
            siblings_spouses: 4,
            parents_children: 5,
            fare: 6,
            embarked: 7,
        };
        let stub = Fixed(vec![0.1, 0.9]);
        let text = "id,class,sex,age,sibsp,parch,fare,port\n5,1,female,30,0,0,80.5,C\n6,3,male,,1,2,7.25,S\n";
        let (out, rows) = InferenceDriver::with_schema(&stub, schema)
            .render(text, Path::new("compact.csv"))
            .unwrap();
        assert_eq!(rows, 2);
        assert_eq!(out, "PassengerId,Survived\n5,1\n6,1\n");

        let err = InferenceDriver::new(&stub).render(text, Path::new("compact.csv")).unwrap_err();
        assert!(matches!(err, TitanicError::MalformedRow { row: 2, .. }));
    }

    #[test]
    fn short_row_is_malformed() {
        let stub = Fixed(vec![0.5, 0.5]);
        let text = "header\n1,3,male\n";
        let err = InferenceDriver::new(&stub).render(text, Path::new("f.csv")).unwrap_err();
        assert!(matches!(err, TitanicError::MalformedRow { row: 2, .. }));
    }

    #[test]
    fn bad_fare_aborts_inference() {
        let stub = Fixed(vec![0.5, 0.5]);
        let text = "h\n1044,3,\"Storey, Mr. Thomas\",male,60.5,0,0,3701,,,S\n";
        let err = InferenceDriver::new(&stub).render(text, Path::new("f.csv")).unwrap_err();
        assert!(matches!(err, TitanicError::InvalidField { row: 2, .. }));
    }

    #[test]
    fn run_overwrites_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("fintest.csv");
        let output = dir.path().join("fintestoutput.csv");
        std::fs::write(&input, FILE).unwrap();
        std::fs::write(&output, "stale contents\nthat should vanish\n").unwrap();

        let rows = InferenceDriver::new(&Fixed(vec![0.7, 0.3])).run(&input, &output).unwrap();
        assert_eq!(rows, 2);
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 3);
        assert_eq!(written, "PassengerId,Survived\n892,0\n893,0\n");
    }
}
