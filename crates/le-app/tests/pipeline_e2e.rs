//! End-to-end pipeline runs against a fake simulator that writes fragment
//! files the way the real one does.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use le_app::*;
use le_results::ResultData;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

// 2020 is a leap year; the series ends on 2021-01-01 23:00.
const HOURS: usize = (366 + 1) * 24;
const REACHES: [i64; 2] = [501, 17];

fn write_series(dir: &Path) {
    let values: Vec<Vec<f64>> = (0..HOURS).map(|h| vec![h as f64, 0.5]).collect();
    let doc = serde_json::json!({
        "unit": "ng/l",
        "reaches": REACHES,
        "values": values,
    });
    fs::write(dir.join("series.json"), doc.to_string()).unwrap();
}

const POPULATION_MODEL: &str = r#"model:
  type: LPopSD
  number_runs: 2
  population:
    minimum_clutch_size: 5
    background_mortality_rate: 0.01
    density_dependent_mortality_rate: 0.00001
    average_temperature: 12.0
    temperature_amplitude: 6.0
    coldest_day_shift: 20
    migration_probability: 0.02
    downstream_probability: 0.7
  toxicokinetics:
    dominant_rate_constant: 0.5
    background_hazard_rate: 0.001
  sd:
    threshold: 20.0
    killing_rate: 0.05
"#;

const INDIVIDUAL_MODEL: &str = r#"model:
  type: CatchmentGUTSIT
  verbosity: 1
  toxicokinetics:
    dominant_rate_constant: 0.5
    background_hazard_rate: 0.001
  it:
    threshold: 3.0
    beta: 2.0
"#;

fn write_config(dir: &Path, name: &str, model: &str) -> PathBuf {
    fs::write(dir.join("LEffectModel.image"), "image").unwrap();
    write_series(dir);
    let yaml = format!(
        r#"version: 1
name: {name}
processing_path: work
simulation_start: 2020-01-01
warm_up_years: 1
multiplication_factors: [1.0, 10.0, 100.0]
concentrations: series.json
simulator:
  executable: squeak
  runtime_files: [LEffectModel.image]
{model}"#
    );
    let path = dir.join("run.yaml");
    fs::write(&path, yaml).unwrap();
    path
}

/// Writes population fragments: day 1 holds `factor * 100 + run`, the last
/// day holds 7, per-reach lines hold the reach position.
struct FakePopulation {
    total_days: usize,
    factors: usize,
    runs: usize,
    calls: usize,
}

impl Simulator for FakePopulation {
    fn run(&mut self, working_dir: &Path) -> AppResult<()> {
        self.calls += 1;
        assert!(working_dir.join("startup.st").exists());
        assert!(working_dir.join("LEffectModel.image").exists());
        let data = working_dir.join("ETInput/CatchmentModelSystem/data");
        assert!(data.join("rummen_2020.msgpack").exists());
        assert!(data.join("rummen_2021.msgpack").exists());
        let control = fs::read_to_string(
            working_dir.join("ETInput/LPopSDModelSystem/parameters/LPopSDModelSystem_control.csv"),
        )?;
        assert!(control.contains("startYear:,2019,"));
        assert!(control.contains("endApplicationYear:,2021,"));

        let out = working_dir.join("ecotalk/LPopSDModelSystem_MoS/x1");
        for f in 1..=self.factors {
            let dir = out.join(format!("x1s{f}"));
            fs::create_dir_all(&dir)?;
            for r in 1..=self.runs {
                let aggregate = format!("1\t0\t{}\n{}\t0\t7\n", f * 100 + r, self.total_days);
                for stem in [
                    "adultMetapop",
                    "embryoMetapop",
                    "extantLocalPopsMetapop",
                    "juvAndAdultMetapop",
                    "juvenileMetapop",
                ] {
                    fs::write(dir.join(format!("x1s{f}r{r}_{stem}.txt")), &aggregate)?;
                }
                let by_reach = format!("2\t0\t1\t2\n{}\t0\t{}\t{}\n", self.total_days, f, r);
                for stem in [
                    "adultPopByReach",
                    "embryoPopByReach",
                    "juvAndAdultPopByReach",
                    "juvenilePopByReach",
                ] {
                    fs::write(dir.join(format!("x1s{f}r{r}_{stem}.txt")), &by_reach)?;
                }
            }
        }
        Ok(())
    }
}

/// Writes one survival fragment per invocation: reach `i`, factor `f`
/// survives with `1 / (invocation + i + f)`.
struct FakeIndividual {
    factors: usize,
    years_seen: Vec<String>,
}

impl Simulator for FakeIndividual {
    fn run(&mut self, working_dir: &Path) -> AppResult<()> {
        let control = fs::read_to_string(working_dir.join(
            "ETInput/CatchmentGUTSITModelSystem/parameters/CatchmentGUTSITModelSystem_control.csv",
        ))?;
        let year = control
            .lines()
            .find_map(|l| l.strip_prefix("applicationYear:,"))
            .and_then(|rest| rest.split(',').next())
            .unwrap()
            .to_string();
        assert!(control.contains("verbose:,1,"));
        let invocation = self.years_seen.len();
        self.years_seen.push(year);

        let ecotalk = working_dir.join("ecotalk");
        fs::write(ecotalk.join("CatchmentGUTSITModelSystem_MoS.modelscript"), "script")?;
        let out = ecotalk.join("CatchmentGUTSITModelSystem_MoS/x1");
        fs::create_dir_all(&out)?;
        let mut text = String::new();
        for i in 0..REACHES.len() {
            let line: Vec<String> = (0..self.factors)
                .map(|f| format!("{}", 1.0 / (invocation + i + f + 1) as f64))
                .collect();
            text.push_str(&line.join("\t"));
            text.push('\n');
        }
        fs::write(out.join("guts_survival_reaches.txt_mfactors.txt"), text)?;
        Ok(())
    }
}

#[test]
fn population_run_reassembles_all_results() {
    let dir = unique_temp_dir("le_app_population");
    let config_path = write_config(&dir, "population", POPULATION_MODEL);
    // 2019-01-01 .. 2022-01-01
    let total_days = 365 + 366 + 365;
    let mut sim = FakePopulation {
        total_days,
        factors: 3,
        runs: 2,
        calls: 0,
    };

    let request = RunRequest {
        config_path: &config_path,
        options: RunOptions::default(),
    };
    let mut stages = Vec::new();
    let response =
        ensure_run_with_simulator(&request, &mut sim, Some(&mut |e: RunProgressEvent| stages.push(e.stage)))
            .unwrap();
    assert!(!response.loaded_from_cache);
    assert_eq!(sim.calls, 1);
    assert_eq!(stages.first(), Some(&RunStage::LoadingConfig));
    assert_eq!(stages.last(), Some(&RunStage::Completed));
    assert!(stages.contains(&RunStage::RunningSimulator));
    assert_eq!(response.manifest.arrays.len(), 9);

    let (manifest, arrays) = load_run(&config_path, &response.run_id).unwrap();
    assert_eq!(manifest.number_runs, Some(2));

    let adult = arrays.iter().find(|a| a.name == "AdultMetaPopulation").unwrap();
    assert_eq!(adult.shape(), &[total_days, 3, 2]);
    assert!(matches!(adult.data, ResultData::Count(_)));
    assert_eq!(adult.get(&[0, 2, 1]), Some(302.0));
    assert_eq!(adult.get(&[1, 2, 1]), Some(0.0));
    assert_eq!(adult.get(&[total_days - 1, 0, 0]), Some(7.0));
    assert_eq!(adult.offset.label(0), "2019-01-01");

    let by_reach = arrays.iter().find(|a| a.name == "JuvenilePopulationByReach").unwrap();
    assert_eq!(by_reach.shape(), &[total_days, 2, 3, 2]);
    assert_eq!(
        by_reach.reaches.as_deref().map(|r| r.iter().map(|id| id.get()).collect::<Vec<_>>()),
        Some(REACHES.to_vec())
    );
    assert_eq!(by_reach.get(&[1, 1, 0, 0]), Some(2.0));
    assert_eq!(by_reach.get(&[total_days - 1, 0, 2, 1]), Some(3.0));
    assert_eq!(by_reach.get(&[total_days - 1, 1, 2, 1]), Some(2.0));

    let points = query::extract_series(adult, 3, 2, None).unwrap();
    assert_eq!(points.len(), total_days);
    assert_eq!(points[0].value, 302.0);

    // Second request comes from the cache without touching the simulator.
    let cached = ensure_run_with_simulator(&request, &mut sim, None).unwrap();
    assert!(cached.loaded_from_cache);
    assert_eq!(cached.run_id, response.run_id);
    assert_eq!(sim.calls, 1);

    // Bypassing the cache reuses the processing path, which is refused.
    let uncached = RunRequest {
        config_path: &config_path,
        options: RunOptions {
            use_cache: false,
            ..RunOptions::default()
        },
    };
    let err = ensure_run_with_simulator(&uncached, &mut sim, None).unwrap_err();
    assert!(matches!(err, AppError::ProcessingPathInUse { .. }));
    assert_eq!(sim.calls, 1);
}

#[test]
fn individual_run_invokes_once_per_year() {
    let dir = unique_temp_dir("le_app_individual");
    let config_path = write_config(&dir, "individual", INDIVIDUAL_MODEL);
    let mut sim = FakeIndividual {
        factors: 3,
        years_seen: Vec::new(),
    };

    let request = RunRequest {
        config_path: &config_path,
        options: RunOptions::default(),
    };
    let response = ensure_run_with_simulator(&request, &mut sim, None).unwrap();
    assert_eq!(sim.years_seen, vec!["2020", "2021"]);

    let ecotalk = dir.join("work/ecotalk");
    assert!(ecotalk.join("CatchmentGUTSITModelSystem_MoS.modelscript.0").exists());
    assert!(ecotalk.join("CatchmentGUTSITModelSystem_MoS.modelscript.1").exists());
    assert!(ecotalk.join("CatchmentGUTSITModelSystem_MoS_1").is_dir());
    assert!(!ecotalk.join("CatchmentGUTSITModelSystem_MoS").exists());

    let array = load_array(&config_path, &response.run_id, "GutsSurvivalReaches").unwrap();
    assert_eq!(array.shape(), &[2, 2, 3]);
    assert!(matches!(array.data, ResultData::Real(_)));
    assert_eq!(array.offset.label(0), "2020");
    assert_eq!(array.get(&[0, 0, 0]), Some(1.0));
    assert_eq!(array.get(&[1, 1, 2]), Some(0.2));

    let runs = list_runs(&config_path).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].model, "CatchmentGUTSIT");
    assert_eq!(runs[0].number_runs, None);

    delete_run(&config_path, &response.run_id).unwrap();
    assert!(list_runs(&config_path).unwrap().is_empty());
}

#[test]
fn run_count_for_individual_model_fails_before_any_file_is_written() {
    let dir = unique_temp_dir("le_app_precondition");
    let config_path = write_config(&dir, "precondition", INDIVIDUAL_MODEL);
    let mut sim = FakeIndividual {
        factors: 3,
        years_seen: Vec::new(),
    };
    let request = RunRequest {
        config_path: &config_path,
        options: RunOptions {
            number_runs: Some(4),
            ..RunOptions::default()
        },
    };
    let err = ensure_run_with_simulator(&request, &mut sim, None).unwrap_err();
    assert!(matches!(err, AppError::Precondition(_)));
    assert!(!dir.join("work").exists());
    assert!(sim.years_seen.is_empty());
}

#[test]
fn missing_fragment_fails_the_run() {
    struct Silent;
    impl Simulator for Silent {
        fn run(&mut self, _working_dir: &Path) -> AppResult<()> {
            Ok(())
        }
    }

    let dir = unique_temp_dir("le_app_missing_fragment");
    let config_path = write_config(&dir, "missing", POPULATION_MODEL);
    let request = RunRequest {
        config_path: &config_path,
        options: RunOptions::default(),
    };
    let err = ensure_run_with_simulator(&request, &mut Silent, None).unwrap_err();
    match err {
        AppError::FileRead { path, source } => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            assert!(path.ends_with("x1s1r1_adultMetapop.txt"));
        }
        other => panic!("expected FileRead, got {other:?}"),
    }
    assert!(list_runs(&config_path).unwrap().is_empty());
}

/// Reports one day past the end of the window in the first fragment.
struct DayOverrun(FakePopulation);

impl Simulator for DayOverrun {
    fn run(&mut self, working_dir: &Path) -> AppResult<()> {
        self.0.run(working_dir)?;
        let fragment =
            working_dir.join("ecotalk/LPopSDModelSystem_MoS/x1/x1s1/x1s1r1_adultMetapop.txt");
        fs::write(fragment, format!("1\t0\t3\n{}\t0\t7\n", self.0.total_days + 1))?;
        Ok(())
    }
}

#[test]
fn day_past_window_is_a_malformed_result() {
    let dir = unique_temp_dir("le_app_day_overrun");
    let config_path = write_config(&dir, "overrun", POPULATION_MODEL);
    let mut sim = DayOverrun(FakePopulation {
        total_days: 365 + 366 + 365,
        factors: 3,
        runs: 2,
        calls: 0,
    });
    let request = RunRequest {
        config_path: &config_path,
        options: RunOptions::default(),
    };
    let err = ensure_run_with_simulator(&request, &mut sim, None).unwrap_err();
    match err {
        AppError::MalformedResult { fragment, line, .. } => {
            assert!(fragment.ends_with("x1s1r1_adultMetapop.txt"));
            assert_eq!(line, 2);
        }
        other => panic!("expected MalformedResult, got {other:?}"),
    }
    assert!(list_runs(&config_path).unwrap().is_empty());
}
