//! End-to-end pipeline runs against the recording engine.

use solarsim_engine::{
    CellAssignment, DryRunEngine, EngineError, EnvSetting, Extension, ExtensionStatus,
    Operation, ResamplingType, TimeConfiguration,
};
use solarsim_runner::{
    run_dsm, run_solar, sync_tiles, DsmConfig, RunnerError, SolarConfig, TilesConfig,
};
use solarsim_tiles::{Result as TileResult, SyncPolicy, SyncReport, TileError, Transport};
use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use url::Url;

fn tiles_in(dir: &Path, names: &[&str]) -> TilesConfig {
    for name in names {
        fs::write(dir.join(name), b"laz").unwrap();
    }
    TilesConfig {
        download_folder: dir.to_path_buf(),
        ..TilesConfig::default()
    }
}

fn solar_config(workspace: &Path) -> SolarConfig {
    for input in ["dem.tif", "zones.shp", "buildings.shp"] {
        fs::write(workspace.join(input), b"").unwrap();
    }
    SolarConfig {
        workspace: workspace.to_path_buf(),
        scratch_workspace: workspace.join("scratch"),
        dem: PathBuf::from("dem.tif"),
        zones: PathBuf::from("zones.shp"),
        buildings: PathBuf::from("buildings.shp"),
        ..SolarConfig::default()
    }
}

#[test]
fn test_dsm_runs_in_order() {
    let tmp = TempDir::new().unwrap();
    let tiles = tiles_in(tmp.path(), &["b.copc.laz", "a.copc.laz", "notes.txt"]);
    let dsm = DsmConfig {
        cell_assignment: CellAssignment::Average,
        ..DsmConfig::default()
    };
    let mut engine = DryRunEngine::new();

    let outcome = run_dsm(&mut engine, &tiles, &dsm).unwrap();

    assert_eq!(
        engine.operation_names(),
        vec![
            "set_env",
            "check_extension",
            "check_out_extension",
            "create_las_dataset",
            "las_dataset_to_raster",
            "check_in_extension",
        ]
    );
    assert_eq!(outcome.tile_count, 2);
    assert_eq!(outcome.dataset, tmp.path().join("Philly2022.lasd"));
    assert_eq!(outcome.raster, tmp.path().join("DSM_Philadelphia_1m.tif"));
    assert!(engine.checked_out().is_empty());

    let ops = engine.operations();
    assert_eq!(
        ops[0],
        Operation::SetEnv {
            setting: EnvSetting::OverwriteOutput(true)
        }
    );
    match &ops[3] {
        Operation::CreateLasDataset {
            in_files,
            out_las_dataset,
            ..
        } => {
            assert_eq!(
                in_files,
                &vec![tmp.path().join("a.copc.laz"), tmp.path().join("b.copc.laz")]
            );
            assert_eq!(out_las_dataset, &outcome.dataset);
        }
        other => panic!("unexpected operation {:?}", other),
    }
    match &ops[4] {
        Operation::LasDatasetToRaster {
            in_las_dataset,
            cell_assignment,
            sampling_value,
            ..
        } => {
            assert_eq!(in_las_dataset, &outcome.dataset);
            assert_eq!(*cell_assignment, CellAssignment::Average);
            assert_eq!(*sampling_value, 1.0);
        }
        other => panic!("unexpected operation {:?}", other),
    }
}

#[test]
fn test_dsm_without_tiles_never_touches_engine() {
    let tmp = TempDir::new().unwrap();
    let tiles = tiles_in(tmp.path(), &["partial.copc.laz.part"]);
    let mut engine = DryRunEngine::new();

    let err = run_dsm(&mut engine, &tiles, &DsmConfig::default()).unwrap_err();

    assert!(matches!(err, RunnerError::NoTiles { .. }));
    assert!(engine.operations().is_empty());
}

#[test]
fn test_dsm_unlicensed_3d_stops_before_checkout() {
    let tmp = TempDir::new().unwrap();
    let tiles = tiles_in(tmp.path(), &["a.copc.laz"]);
    let mut engine =
        DryRunEngine::new().with_extension_status(Extension::ThreeD, ExtensionStatus::NotLicensed);

    let err = run_dsm(&mut engine, &tiles, &DsmConfig::default()).unwrap_err();

    assert!(matches!(
        err,
        RunnerError::Engine(EngineError::ExtensionUnavailable {
            extension: Extension::ThreeD,
            status: ExtensionStatus::NotLicensed,
        })
    ));
    assert_eq!(engine.operation_names(), vec!["set_env", "check_extension"]);
    assert!(engine.checked_out().is_empty());
}

#[test]
fn test_dsm_failure_leaves_3d_checked_out() {
    let tmp = TempDir::new().unwrap();
    let tiles = tiles_in(tmp.path(), &["a.copc.laz"]);
    let mut engine = DryRunEngine::new().with_failure("las_dataset_to_raster", "out of disk");

    let err = run_dsm(&mut engine, &tiles, &DsmConfig::default()).unwrap_err();

    assert!(err.to_string().contains("out of disk"));
    assert_eq!(engine.operation_names().last(), Some(&"las_dataset_to_raster"));
    assert!(engine.checked_out().contains(&Extension::ThreeD));
}

#[test]
fn test_solar_runs_in_order() {
    let tmp = TempDir::new().unwrap();
    let config = SolarConfig {
        sky_size: 100,
        end_day: 31,
        ..solar_config(tmp.path())
    };
    let mut engine = DryRunEngine::new();

    let outcome = run_solar(&mut engine, &config).unwrap();

    assert_eq!(
        engine.operation_names(),
        vec![
            "check_extension",
            "check_out_extension",
            "set_env",
            "set_env",
            "set_env",
            "clip_raster",
            "resample",
            "set_env",
            "area_solar_radiation",
            "check_in_extension",
        ]
    );
    assert!(outcome.inputs.all_present());
    assert!(engine.checked_out().is_empty());

    let ops = engine.operations();
    assert_eq!(
        ops[2],
        Operation::SetEnv {
            setting: EnvSetting::ScratchWorkspace(tmp.path().join("scratch"))
        }
    );
    assert_eq!(
        ops[3],
        Operation::SetEnv {
            setting: EnvSetting::Workspace(tmp.path().to_path_buf())
        }
    );
    assert_eq!(
        ops[5],
        Operation::ClipRaster {
            in_raster: tmp.path().join("dem.tif"),
            out_raster: PathBuf::from("Clipped_DEM_EZ.tif"),
            in_template_dataset: tmp.path().join("zones.shp"),
            nodata_value: -9999.0,
            clipping_geometry: true,
            maintain_clipping_extent: true,
        }
    );
    assert_eq!(
        ops[6],
        Operation::Resample {
            in_raster: PathBuf::from("Clipped_DEM_EZ.tif"),
            out_raster: PathBuf::from("Resampled_DEM_3m.tif"),
            cell_size: 3.0,
            resampling_type: ResamplingType::Bilinear,
        }
    );
    assert_eq!(
        ops[7],
        Operation::SetEnv {
            setting: EnvSetting::Mask(tmp.path().join("buildings.shp"))
        }
    );
    assert_eq!(
        ops[8],
        Operation::AreaSolarRadiation {
            in_surface_raster: PathBuf::from("Resampled_DEM_3m.tif"),
            latitude: None,
            sky_size: 100,
            time_configuration: TimeConfiguration::MultipleDays {
                year: 2025,
                start_day: 1,
                end_day: 31,
            },
            out_raster: PathBuf::from("SolarRadiation_EZ_3m.tif"),
        }
    );
}

#[test]
fn test_solar_missing_inputs_still_runs() {
    let tmp = TempDir::new().unwrap();
    let config = SolarConfig {
        buildings: PathBuf::from("missing.shp"),
        ..solar_config(tmp.path())
    };
    let mut engine = DryRunEngine::new();

    let outcome = run_solar(&mut engine, &config).unwrap();

    assert!(outcome.inputs.dem);
    assert!(!outcome.inputs.buildings);
    assert_eq!(engine.operations().len(), 10);
}

#[test]
fn test_solar_failure_leaves_spatial_checked_out() {
    let tmp = TempDir::new().unwrap();
    let config = solar_config(tmp.path());
    let mut engine = DryRunEngine::new().with_failure("area_solar_radiation", "ERROR 999999");

    let err = run_solar(&mut engine, &config).unwrap_err();

    assert!(matches!(
        err,
        RunnerError::Engine(EngineError::OperationFailed {
            op: "area_solar_radiation",
            ..
        })
    ));
    assert!(engine.checked_out().contains(&Extension::Spatial));
}

#[test]
fn test_solar_invalid_day_range_rejected_before_running() {
    let tmp = TempDir::new().unwrap();
    let config = SolarConfig {
        start_day: 200,
        end_day: 100,
        ..solar_config(tmp.path())
    };
    let mut engine = DryRunEngine::new();

    let err = run_solar(&mut engine, &config).unwrap_err();

    assert!(matches!(
        err,
        RunnerError::Engine(EngineError::InvalidParameter { .. })
    ));
    assert!(!engine
        .operation_names()
        .contains(&"area_solar_radiation"));
}

/// Serves a one-tile listing.
struct OneTile {
    requests: RefCell<Vec<String>>,
}

impl Transport for OneTile {
    fn get_text(&self, url: &Url) -> TileResult<String> {
        self.requests.borrow_mut().push(url.to_string());
        Ok(r#"<a href="t1.copc.laz">t1</a>"#.to_string())
    }

    fn download(&self, url: &Url, out: &mut dyn Write) -> TileResult<u64> {
        self.requests.borrow_mut().push(url.to_string());
        out.write_all(b"points").map_err(TileError::Io)?;
        Ok(6)
    }
}

#[test]
fn test_sync_tiles_uses_configured_cache() {
    let tmp = TempDir::new().unwrap();
    let config = TilesConfig {
        download_folder: tmp.path().join("cache"),
        base_url: "https://example.com/laz".to_string(),
        ..TilesConfig::default()
    };
    let transport = OneTile {
        requests: RefCell::new(Vec::new()),
    };

    let report = sync_tiles(&config, SyncPolicy::SkipIfAnyPresent, &transport).unwrap();

    assert_eq!(report.downloaded(), 1);
    assert_eq!(
        fs::read(tmp.path().join("cache").join("t1.copc.laz")).unwrap(),
        b"points"
    );
    assert_eq!(
        transport.requests.borrow().as_slice(),
        &[
            "https://example.com/laz/index.html".to_string(),
            "https://example.com/laz/t1.copc.laz".to_string(),
        ]
    );

    let again = sync_tiles(&config, SyncPolicy::SkipIfAnyPresent, &transport).unwrap();
    assert_eq!(again, SyncReport::Skipped { existing: 1 });
}
