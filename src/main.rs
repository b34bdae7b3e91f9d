use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::Parser;
use senda::service::{RouteResponse, RoutingService};
use senda::{GraphBuilder, LineFeature, PointFeature, Weights};
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error("{0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("{0}: {1}")]
    Parse(PathBuf, #[source] serde_json::Error),
}

#[derive(Parser)]
struct Cli {
    /// The path to a JSON array of point features
    points_file: PathBuf,

    /// The path to a JSON array of line features
    lines_file: PathBuf,

    /// Latitude of the start point
    start_lat: f64,

    /// Longitude of the start point
    start_lon: f64,

    /// Latitude of the end point
    end_lat: f64,

    /// Longitude of the end point
    end_lon: f64,

    /// Seed for synthesized node attributes; drawn from the OS when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum distance for snapping start/end positions onto the network, in meters
    #[arg(long, default_value_t = senda::DEFAULT_MAX_SNAP_DISTANCE)]
    snap_distance: f64,

    /// Weight of the distance cost component
    #[arg(long, default_value_t = 1.0)]
    w_dist: f64,

    /// Weight of the elevation-gain cost component
    #[arg(long, default_value_t = 0.0)]
    w_elev: f64,

    /// Weight of the safety cost component
    #[arg(long, default_value_t = 0.0)]
    w_seg: f64,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let points: Vec<PointFeature> = load_features(&cli.points_file)?;
    let lines: Vec<LineFeature> = load_features(&cli.lines_file)?;

    let builder = match cli.seed {
        Some(seed) => GraphBuilder::seeded(seed),
        None => GraphBuilder::new(),
    };
    let service = RoutingService::new();
    service.install(builder.build(points, lines));

    let start = service
        .nearest_node(cli.start_lat, cli.start_lon, Some(cli.snap_distance))?
        .ok_or("no node corresponding to the given start position")?;
    let end = service
        .nearest_node(cli.end_lat, cli.end_lon, Some(cli.snap_distance))?
        .ok_or("no node corresponding to the given end position")?;

    let weights = Weights {
        distance: cli.w_dist,
        elevation: cli.w_elev,
        safety: cli.w_seg,
    };
    let response = service.route(start.node_id, end.node_id, Some(weights))?;

    println!("{}", serde_json::to_string_pretty(&as_geojson(&response))?);
    Ok(())
}

fn load_features<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::Io(path.to_path_buf(), e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| LoadError::Parse(path.to_path_buf(), e))
}

fn as_geojson(response: &RouteResponse) -> serde_json::Value {
    let line_string = |coords: &[[f64; 2]], algorithm: &str| {
        serde_json::json!({
            "type": "Feature",
            "properties": { "algorithm": algorithm },
            "geometry": {
                "type": "LineString",
                // GeoJSON positions are [lon, lat]
                "coordinates": coords
                    .iter()
                    .map(|&[lat, lon]| [lon, lat])
                    .collect::<Vec<_>>(),
            },
        })
    };

    serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            line_string(&response.dijkstra_coords, "dijkstra"),
            line_string(&response.astar_coords, "astar"),
        ],
    })
}
