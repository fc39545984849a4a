use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use le_core::{ReachId, YearSlices};
use le_export::*;
use le_project::HourlySeries;
use ndarray::Array2;
use proptest::prelude::*;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    std::fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

#[test]
fn exported_records_read_back_exactly() {
    let dir = unique_temp_dir("le_export_roundtrip");
    let start = NaiveDate::from_ymd_opt(2019, 11, 15).unwrap();
    // 2019-11-15 .. 2021-01-02: three calendar years
    let hours = (47 + 366 + 1) * 24;
    let values = Array2::from_shape_fn((hours, 3), |(h, r)| (h as f64) * 0.5 + r as f64);
    let reaches = vec![ReachId::new(300), ReachId::new(4), ReachId::new(1001)];
    let series = HourlySeries::new(reaches.clone(), values).unwrap();
    let slices = YearSlices::compute(start, hours).unwrap();

    let written = export_concentrations(&dir, &series, &slices).unwrap();
    assert_eq!(written.len(), 3);
    assert_eq!(written[0].file_name().unwrap(), "rummen_2019.msgpack");
    assert_eq!(written[2].file_name().unwrap(), "rummen_2021.msgpack");

    for (slice, path) in slices.iter().zip(&written) {
        let record = read_year_record(path).unwrap();
        assert_eq!(record.len(), 3);
        let offset = start_offset(&slice, start);
        for (i, buffer) in record.iter().enumerate() {
            assert_eq!(buffer.reach(), reaches[i]);
            let expected = series.reach_slice(i, slice.hours.clone()).to_vec();
            assert_eq!(buffer.values(offset, slice.len()).unwrap(), expected.as_slice());
            let slots = buffer.as_slice();
            assert!(slots[1..offset].iter().all(|v| *v == 0.0));
            assert!(slots[offset + slice.len()..].iter().all(|v| *v == 0.0));
        }
    }
}

proptest! {
    #[test]
    fn pack_round_trip(
        offset in 1_usize..4000,
        values in prop::collection::vec(0.0_f64..1.0e6, 0..4000),
        reach in 0_i64..1_000_000,
    ) {
        let buffer = ExportBuffer::pack(ReachId::new(reach), offset, values.clone()).unwrap();
        prop_assert_eq!(buffer.reach(), ReachId::new(reach));
        prop_assert_eq!(buffer.values(offset, values.len()).unwrap(), values.as_slice());
        let slots = buffer.as_slice();
        prop_assert!(slots[1..offset].iter().all(|v| *v == 0.0));
        prop_assert!(slots[offset + values.len()..].iter().all(|v| *v == 0.0));
    }
}
