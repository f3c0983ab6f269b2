use csv::ReaderBuilder;
use rand::Rng;
use risk_pathfinding::{Cell, RiskGrid};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Risk assigned to `~` tiles that have no entry in the map's risk file.
pub const DEFAULT_MAP_RISK: f64 = 1.0;

/// Parameters for [random_grid]. The defaults reproduce a 30x30 field where a fifth of the cells
/// are obstacles and a tenth carry a risk of up to 10% of the diagonal.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub rows: usize,
    pub cols: usize,
    pub obstacle_density: f64,
    pub risk_density: f64,
    pub min_risk: f64,
    pub max_risk_fraction: f64,
}

impl Default for ScenarioConfig {
    fn default() -> ScenarioConfig {
        ScenarioConfig {
            rows: 30,
            cols: 30,
            obstacle_density: 0.2,
            risk_density: 0.1,
            min_risk: 0.1,
            max_risk_fraction: risk_pathfinding::MAX_RISK_FRACTION,
        }
    }
}

/// Generates a random grid. Obstacles and risk cells are drawn independently, so a cell can be
/// both.
pub fn random_grid<R: Rng>(config: &ScenarioConfig, rng: &mut R) -> RiskGrid {
    let diagonal = (config.rows as f64).hypot(config.cols as f64);
    let max_risk = (config.max_risk_fraction * diagonal).max(config.min_risk);
    let mut obstacles = Vec::new();
    for row in 0..config.rows as i32 {
        for col in 0..config.cols as i32 {
            if rng.gen_bool(config.obstacle_density) {
                obstacles.push(Cell::new(row, col));
            }
        }
    }
    let mut risk = Vec::new();
    for row in 0..config.rows as i32 {
        for col in 0..config.cols as i32 {
            if rng.gen_bool(config.risk_density) {
                let value = if max_risk > config.min_risk {
                    rng.gen_range(config.min_risk..max_risk)
                } else {
                    config.min_risk
                };
                risk.push((Cell::new(row, col), value));
            }
        }
    }
    RiskGrid::with_layout(config.rows, config.cols, obstacles, risk)
        .expect("Could not build random grid")
}

/// Picks a uniformly random free cell, or [None] if every cell is blocked.
pub fn random_free_cell<R: Rng>(grid: &RiskGrid, rng: &mut R) -> Option<Cell> {
    let free: Vec<Cell> = (0..grid.rows() as i32)
        .flat_map(|row| (0..grid.cols() as i32).map(move |col| Cell::new(row, col)))
        .filter(|c| !grid.is_blocked(*c))
        .collect();
    if free.is_empty() {
        None
    } else {
        Some(free[rng.gen_range(0..free.len())])
    }
}

/// A start/goal pair with the cost of a cheapest route between them.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub id: u32,
    pub start: Cell,
    pub goal: Cell,
    pub cost: f64,
}

#[derive(Debug, Deserialize)]
struct ScenarioRecord {
    id: u32,
    start_row: i32,
    start_col: i32,
    goal_row: i32,
    goal_col: i32,
    cost: f64,
}

#[derive(Debug, Deserialize)]
struct RiskRecord {
    row: i32,
    col: i32,
    risk: f64,
}

fn data_dir(kind: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(kind)
}

/// Parses a map in text form: a `rows R` and a `cols C` line, a `map` line and then one line per
/// grid row where `.` is free, `@`, `#` or `T` is an obstacle and `~` is a risk cell.
pub fn parse_map(map_str: &str) -> RiskGrid {
    let lines: Vec<&str> = map_str.lines().collect();
    let parse_line = |line: &str, key: &str| -> usize {
        let (k, v) = line.split_once(' ').expect("Could not split header line");
        assert_eq!(k, key, "Unexpected map header");
        v.trim().parse::<usize>().expect("Could not parse value")
    };
    let rows = parse_line(lines[0], "rows");
    let cols = parse_line(lines[1], "cols");
    assert_eq!(lines[2].trim(), "map", "Missing map section");

    let offset = 3;
    let mut obstacles = Vec::new();
    let mut risk = Vec::new();
    for row in 0..rows {
        let tiles = lines[offset + row].as_bytes();
        for col in 0..cols {
            let cell = Cell::new(row as i32, col as i32);
            match tiles[col] {
                b'.' => {}
                b'~' => risk.push((cell, DEFAULT_MAP_RISK)),
                b'@' | b'#' | b'T' => obstacles.push(cell),
                tile => panic!("Unknown tile {:?} at {}", tile as char, cell),
            }
        }
    }
    RiskGrid::with_layout(rows, cols, obstacles, risk).expect("Could not build grid from map")
}

fn load_risk_overrides(grid: &mut RiskGrid, path: &Path) {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .expect("Could not open risk file");
    for result in reader.deserialize() {
        let record: RiskRecord = result.expect("Could not parse risk record");
        grid.set_risk(Cell::new(record.row, record.col), record.risk)
            .expect("Invalid risk record");
    }
}

fn load_scenarios(path: &Path) -> Vec<Scenario> {
    let scen_str = fs::read_to_string(path).expect("Could not read scenario file");
    // Skip the version line
    let remaining_data = scen_str.lines().skip(1).collect::<Vec<_>>().join("\n");
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(remaining_data.as_bytes());
    csv_reader
        .deserialize()
        .map(|result| {
            let record: ScenarioRecord = result.expect("Could not parse scenario record");
            Scenario {
                id: record.id,
                start: Cell::new(record.start_row, record.start_col),
                goal: Cell::new(record.goal_row, record.goal_col),
                cost: record.cost,
            }
        })
        .collect()
}

fn load_map(name: &str) -> (RiskGrid, Vec<Scenario>) {
    let maps = data_dir("maps");
    let map_str = fs::read_to_string(maps.join(format!("{}.map", name)))
        .expect("Could not read map file");
    let mut grid = parse_map(&map_str);
    let risk_path = maps.join(format!("{}.risk.csv", name));
    if risk_path.exists() {
        load_risk_overrides(&mut grid, &risk_path);
    }
    let scenarios = load_scenarios(&data_dir("scenarios").join(format!("{}.scen", name)));
    (grid, scenarios)
}

/// Names of all maps shipped with this crate, relative to the maps directory and without extension.
pub fn get_map_names() -> Vec<String> {
    let root = data_dir("maps");
    let mut names = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.expect("Could not get dir entry");
        let rel_path = entry
            .path()
            .strip_prefix(&root)
            .expect("Entry outside of maps directory");
        if let Some(name) = rel_path.to_str().and_then(|s| s.strip_suffix(".map")) {
            names.push(name.to_owned());
        }
    }
    names
}

pub fn get_map(name: &str) -> (RiskGrid, Vec<Scenario>) {
    if get_map_names().iter().any(|n| n == name) {
        load_map(name)
    } else {
        panic!("Could not load map {}!", name);
    }
}
