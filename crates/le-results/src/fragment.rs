//! Locating and tokenizing the simulator's text fragments.
//!
//! Fragments are tab-separated, one record per line. Which file holds which
//! scenario is fixed by the simulator: per multiplication factor and run
//! (both 1-based) for population models, per simulated year (0-based) for
//! individual models.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::{ResultsError, ResultsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKey {
    /// 1-based multiplication factor and run.
    Scenario { factor: usize, run: usize },
    /// 0-based simulated year.
    Year { year_index: usize },
}

/// Anything fragments can be read from.
pub trait FragmentSource {
    /// Name used in error messages.
    fn describe(&self, key: FragmentKey) -> String;

    fn open(&self, key: FragmentKey) -> ResultsResult<Box<dyn BufRead + '_>>;
}

/// On-disk fragment naming of the simulator's output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentLayout {
    /// `<output_dir>/x1/x1s{f}/x1s{f}r{r}_<stem>.txt`
    Scenario { output_dir: PathBuf, stem: String },
    /// `<ecotalk_dir>/<output_name>_{y}/x1/<file_name>`
    Yearly {
        ecotalk_dir: PathBuf,
        output_name: String,
        file_name: String,
    },
}

impl FragmentLayout {
    pub fn path(&self, key: FragmentKey) -> ResultsResult<PathBuf> {
        match (self, key) {
            (FragmentLayout::Scenario { output_dir, stem }, FragmentKey::Scenario { factor, run }) => {
                Ok(output_dir
                    .join("x1")
                    .join(format!("x1s{factor}"))
                    .join(format!("x1s{factor}r{run}_{stem}.txt")))
            }
            (
                FragmentLayout::Yearly {
                    ecotalk_dir,
                    output_name,
                    file_name,
                },
                FragmentKey::Year { year_index },
            ) => Ok(ecotalk_dir
                .join(format!("{output_name}_{year_index}"))
                .join("x1")
                .join(file_name)),
            _ => Err(ResultsError::Malformed {
                fragment: format!("{key:?}"),
                line: 0,
                reason: "fragment key does not match the layout".to_string(),
            }),
        }
    }
}

impl FragmentSource for FragmentLayout {
    fn describe(&self, key: FragmentKey) -> String {
        match self.path(key) {
            Ok(path) => path.display().to_string(),
            Err(_) => format!("{key:?}"),
        }
    }

    fn open(&self, key: FragmentKey) -> ResultsResult<Box<dyn BufRead + '_>> {
        let path = self.path(key)?;
        let file = File::open(&path).map_err(|source| ResultsError::FragmentOpen {
            path: path.clone(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// One non-blank fragment line split into its tab-separated fields.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Record<'a> {
    /// 1-based line number within the fragment.
    pub line: usize,
    pub fields: Vec<&'a str>,
}

pub(crate) fn split_record(line_no: usize, line: &str) -> Option<Record<'_>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }
    Some(Record {
        line: line_no,
        fields: line.split('\t').collect(),
    })
}

/// Iterate a fragment line by line, handing every non-blank record to `f`.
pub(crate) fn for_each_record<R, F>(reader: &mut R, fragment: &str, mut f: F) -> ResultsResult<usize>
where
    R: BufRead + ?Sized,
    F: FnMut(Record<'_>) -> ResultsResult<()>,
{
    let mut buf = String::new();
    let mut line_no = 0;
    let mut records = 0;
    loop {
        buf.clear();
        let read = reader.read_line(&mut buf).map_err(|e| match e.kind() {
            // Not UTF-8 text; the fragment itself is broken.
            std::io::ErrorKind::InvalidData => malformed(fragment, line_no + 1, e.to_string()),
            _ => ResultsError::Io(e),
        })?;
        if read == 0 {
            break;
        }
        line_no += 1;
        if let Some(record) = split_record(line_no, &buf) {
            records += 1;
            f(record)?;
        }
    }
    Ok(records)
}

pub(crate) fn malformed(fragment: &str, line: usize, reason: impl Into<String>) -> ResultsError {
    ResultsError::Malformed {
        fragment: fragment.to_string(),
        line,
        reason: reason.into(),
    }
}

pub(crate) fn parse_field<T>(fragment: &str, record: &Record<'_>, index: usize, what: &str) -> ResultsResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = record.fields.get(index).ok_or_else(|| {
        malformed(
            fragment,
            record.line,
            format!("missing {what} (field {})", index + 1),
        )
    })?;
    raw.trim().parse::<T>().map_err(|e| {
        malformed(
            fragment,
            record.line,
            format!("invalid {what} {raw:?}: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn scenario_paths_are_one_based() {
        let layout = FragmentLayout::Scenario {
            output_dir: PathBuf::from("/w/ecotalk/LPopSDModelSystem_MoS"),
            stem: "adultMetapop".to_string(),
        };
        let path = layout
            .path(FragmentKey::Scenario { factor: 2, run: 3 })
            .unwrap();
        assert_eq!(
            path,
            Path::new("/w/ecotalk/LPopSDModelSystem_MoS/x1/x1s2/x1s2r3_adultMetapop.txt")
        );
    }

    #[test]
    fn yearly_paths_use_renamed_output() {
        let layout = FragmentLayout::Yearly {
            ecotalk_dir: PathBuf::from("/w/ecotalk"),
            output_name: "CatchmentGUTSSDModelSystem_MoS".to_string(),
            file_name: "guts_survival_reaches.txt_mfactors.txt".to_string(),
        };
        let path = layout.path(FragmentKey::Year { year_index: 0 }).unwrap();
        assert_eq!(
            path,
            Path::new(
                "/w/ecotalk/CatchmentGUTSSDModelSystem_MoS_0/x1/guts_survival_reaches.txt_mfactors.txt"
            )
        );
        assert!(layout.path(FragmentKey::Scenario { factor: 1, run: 1 }).is_err());
    }

    #[test]
    fn split_record_strips_line_endings() {
        let record = split_record(4, "3\tx\t17\r\n").unwrap();
        assert_eq!(record.fields, vec!["3", "x", "17"]);
        assert_eq!(record.line, 4);
        assert!(split_record(5, "   \n").is_none());
    }

    #[test]
    fn missing_fragment_is_an_io_error() {
        let layout = FragmentLayout::Scenario {
            output_dir: std::env::temp_dir().join("le_results_does_not_exist"),
            stem: "adultMetapop".to_string(),
        };
        let err = layout
            .open(FragmentKey::Scenario { factor: 1, run: 1 })
            .err()
            .unwrap();
        assert!(matches!(err, ResultsError::FragmentOpen { .. }));
    }

    #[test]
    fn read_failures_stay_io_errors() {
        struct Failing;
        impl std::io::Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
            }
        }

        let mut reader = std::io::BufReader::new(Failing);
        let err = for_each_record(&mut reader, "f", |_| Ok(())).unwrap_err();
        assert!(matches!(err, ResultsError::Io(_)));

        let mut bytes: &[u8] = b"1\t0\t2\n\xff\xfe\n";
        let err = for_each_record(&mut bytes, "f", |_| Ok(())).unwrap_err();
        assert!(matches!(err, ResultsError::Malformed { line: 2, .. }));
    }
}
