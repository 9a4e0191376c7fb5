#![allow(dead_code)]

use std::path::{Path, PathBuf};

use casemap::InputPaths;

pub const GEOGRAPHY: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "properties": { "areaCode": 1, "areaName": "Eenstad" }, "geometry": null },
    { "type": "Feature", "properties": { "areaCode": 2, "areaName": "Tweedorp" }, "geometry": null },
    { "type": "Feature", "properties": { "areaCode": 3, "areaName": "Driehoven" }, "geometry": null },
    { "type": "Feature", "properties": { "areaCode": 4, "areaName": "Vierveen" }, "geometry": null }
  ]
}"#;

pub const POPULATION: &str = "\
Regions;PopulationOn31December_20;PopulationOn1January_1
GM0001;1000;1000
GM0002;500;500
GM0003;10000;10000
";

/// 3 municipalities x 3 days, semicolon delimited and out of order. GM0003 is corrected
/// downwards on day 2.
pub const CASES: &str = "\
Date_of_report;Municipality_code;Total_reported
2021-03-03 10:00:00;GM0001;15
2021-03-01 10:00:00;GM0001;10
2021-03-02 10:00:00;GM0001;12
2021-03-01 10:00:00;GM0002;0
2021-03-02 10:00:00;GM0002;0
2021-03-03 10:00:00;GM0002;5
2021-03-01 10:00:00;GM0003;100
2021-03-02 10:00:00;GM0003;90
2021-03-03 10:00:00;GM0003;100
2021-03-01 10:00:00;;7
";

/// Write the fixture files into a fresh directory under `target/`.
pub fn write_fixture(name: &str, cases: &str) -> (PathBuf, InputPaths) {
    let dir = PathBuf::from("target").join("casemap-tests").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    let paths = InputPaths {
        geography: dir.join("geo.json"),
        population: dir.join("population.csv"),
        cases: dir.join("cases.csv"),
    };
    write(&paths.geography, GEOGRAPHY);
    write(&paths.population, POPULATION);
    write(&paths.cases, cases);
    (dir, paths)
}

fn write(path: &Path, text: &str) {
    std::fs::write(path, text).unwrap();
}
