use std::path::Path;

use crate::error::{Result, TitanicError};

/// Column names of the named-header datasets.
pub mod columns {
    pub const CLASS: &str = "Pclass";
    pub const SEX: &str = "Sex";
    pub const AGE: &str = "Age";
    pub const SIBLINGS_SPOUSES: &str = "SibSp";
    pub const PARENTS_CHILDREN: &str = "Parch";
    pub const FARE: &str = "Fare";
    pub const EMBARKED: &str = "Embarked";
    pub const SURVIVED: &str = "Survived";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Exactly `male` is male; everything else, including blanks, is female.
    pub fn from_cell(cell: &str) -> Sex {
        if cell == "male" { Sex::Male } else { Sex::Female }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    Southampton,
    Cherbourg,
    /// Queenstown, missing, or anything unrecognised.
    Other,
}

impl Port {
    pub fn from_cell(cell: &str) -> Port {
        match cell {
            "S" => Port::Southampton,
            "C" => Port::Cherbourg,
            _ => Port::Other,
        }
    }
}

/// One passenger, parsed and typed. Age is the only optional field.
#[derive(Debug, Clone, PartialEq)]
pub struct PassengerRecord {
    pub class: u8,
    pub sex: Sex,
    pub age: Option<f64>,
    pub siblings_spouses: u32,
    pub parents_children: u32,
    pub fare: f64,
    pub embarked: Port,
}

/// Unparsed cells for one passenger, borrowed from whichever row layout
/// produced them.
#[derive(Debug, Clone, Copy)]
pub struct RawPassenger<'a> {
    pub class: &'a str,
    pub sex: &'a str,
    pub age: &'a str,
    pub siblings_spouses: &'a str,
    pub parents_children: &'a str,
    pub fare: &'a str,
    pub embarked: &'a str,
}

impl RawPassenger<'_> {
    /// Parses the cells into a record.
    ///
    /// A blank, unparseable or non-finite age becomes `None`. Every other
    /// numeric cell must parse; failures name the file, row and column.
    pub fn parse(&self, path: &Path, row: usize) -> Result<PassengerRecord> {
        let field = |column: &str, value: &str| TitanicError::InvalidField {
            path: path.to_path_buf(),
            row,
            column: column.to_string(),
            value: value.to_string(),
        };

        let class = self.class.trim().parse::<u8>()
            .map_err(|_| field(columns::CLASS, self.class))?;
        let siblings_spouses = self.siblings_spouses.trim().parse::<u32>()
            .map_err(|_| field(columns::SIBLINGS_SPOUSES, self.siblings_spouses))?;
        let parents_children = self.parents_children.trim().parse::<u32>()
            .map_err(|_| field(columns::PARENTS_CHILDREN, self.parents_children))?;
        let fare = self.fare.trim().parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| field(columns::FARE, self.fare))?;
        let age = self.age.trim().parse::<f64>().ok().filter(|a| a.is_finite());

        Ok(PassengerRecord {
            class,
            sex: Sex::from_cell(self.sex.trim()),
            age,
            siblings_spouses,
            parents_children,
            fare,
            embarked: Port::from_cell(self.embarked.trim()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw<'a>(age: &'a str, fare: &'a str) -> RawPassenger<'a> {
        RawPassenger {
            class: "3",
            sex: "male",
            age,
            siblings_spouses: "1",
            parents_children: "0",
            fare,
            embarked: "S",
        }
    }

    #[test]
    fn parses_a_complete_row() {
        let rec = raw("22", "7.25").parse(Path::new("t.csv"), 2).unwrap();
        assert_eq!(rec.class, 3);
        assert_eq!(rec.sex, Sex::Male);
        assert_eq!(rec.age, Some(22.0));
        assert_eq!(rec.siblings_spouses, 1);
        assert_eq!(rec.embarked, Port::Southampton);
    }

    #[test]
    fn bad_age_becomes_missing() {
        for age in ["", "unknown", "NaN", "inf"] {
            let rec = raw(age, "7.25").parse(Path::new("t.csv"), 2).unwrap();
            assert_eq!(rec.age, None, "age cell {age:?}");
        }
    }

    #[test]
    fn bad_fare_is_fatal_with_location() {
        let err = raw("30", "").parse(Path::new("t.csv"), 9).unwrap_err();
        match err {
            TitanicError::InvalidField { row, column, .. } => {
                assert_eq!(row, 9);
                assert_eq!(column, columns::FARE);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(raw("30", "NaN").parse(Path::new("t.csv"), 9).is_err());
    }

    #[test]
    fn categorical_cells_fall_back() {
        assert_eq!(Sex::from_cell("female"), Sex::Female);
        assert_eq!(Sex::from_cell("Male"), Sex::Female);
        assert_eq!(Port::from_cell("C"), Port::Cherbourg);
        assert_eq!(Port::from_cell("Q"), Port::Other);
        assert_eq!(Port::from_cell(""), Port::Other);
    }
}
