use sfcc_tools::name::{parse_command, parse_filename};
use sfcc_tools::plan::ConfigTree;
use sfcc_tools::runner::{invocation, Direction};
use sfcc_tools::{BenchConfig, ToolPaths};

#[test]
fn expected_filenames_parse_back() {
    for config in BenchConfig::all_valid() {
        let name = config.expected_filename("s23_e019.tif.sfcc");
        let parsed = parse_filename(&name).unwrap();
        assert_eq!(parsed.config(), config, "{name}");
        assert_eq!(parsed.filename, "s23_e019");
    }
}

#[test]
fn every_job_command_maps_to_its_configuration() {
    let tools = ToolPaths::default();
    for config in BenchConfig::all_valid() {
        for direction in [Direction::Compress, Direction::Decompress] {
            let job = invocation(&tools, direction, &config, "/data/dem.sfcc").unwrap();
            let parsed = parse_command(&job.to_string()).unwrap();
            assert_eq!(parsed.config(), config, "{job}");
            assert_eq!(parsed.filename, "dem");
        }
    }
}

#[test]
fn driver_lines_map_to_their_configuration() {
    let tree = ConfigTree::build();
    let lines = tree.driver_job_lines(&["dem.sfcc"]);
    let configs: Vec<BenchConfig> = tree.pre_order().into_iter().skip(1).collect();
    assert_eq!(lines.len(), configs.len() * 2);
    for (pair, config) in lines.chunks(2).zip(configs) {
        for line in pair {
            assert_eq!(parse_command(line).unwrap().config(), config, "{line}");
        }
    }
}
