use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use sfcc_tools::SfccHeader;

fn run(exe: &str, args: &[&str]) -> Output {
    Command::new(exe)
        .args(args)
        .env_remove("SFCC_TOOLS")
        .env("RUST_LOG", "warn")
        .output()
        .expect("run failed")
}

fn write_sfcc(path: &Path, header: &SfccHeader, payload: &[u8]) {
    let mut bytes = header.encode();
    bytes.extend_from_slice(payload);
    fs::write(path, bytes).unwrap();
}

#[test]
fn info_prints_header_fields() {
    let exe = env!("CARGO_BIN_EXE_sfcc_info");
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("dem.sfcc");
    write_sfcc(&input, &SfccHeader::raw(2, 3, 2), &[7u8; 128]);

    let output = run(exe, &[input.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Number of Dimensions:\t2"));
    assert!(stdout.contains("# Sidelength:\t\t8\t[2^3]"));
    assert!(stdout.contains("# SFC Type:\t\tRaster"));

    let output = run(exe, &[input.to_str().unwrap(), "--json"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["sidelength"], 8);
    assert_eq!(json["header"]["curve"], "RowMajor");
}

#[test]
fn info_rejects_bad_magic() {
    let exe = env!("CARGO_BIN_EXE_sfcc_info");
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.sfcc");
    fs::write(&input, b"NOTSFCCDATA").unwrap();
    let output = run(exe, &[input.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Verify the file is an intact SFCC file"));
}

#[test]
fn geotiff_requires_tif_extension() {
    let exe = env!("CARGO_BIN_EXE_geotiff2sfcc");
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("dem.png");
    fs::write(&input, b"x").unwrap();
    let output = run(exe, &[input.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid file extension"));
}

#[test]
fn compress_dry_run_prints_command() {
    let exe = env!("CARGO_BIN_EXE_sfcc_compress");
    let output = run(
        exe,
        &["compress", "hilbert", "nobwt", "btr", "gzip", "dem.sfcc", "--dry-run"],
    );
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "gzip -k -9 -f dem.sfcc.hbrt.btr\n");

    let output = run(
        exe,
        &["decompress", "zorder", "bwt", "nobtr", "lz77", "dem.sfcc", "--dry-run"],
    );
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "sfccompress decompress dem.sfcc.mrtn.bwt.lz77\n"
    );
}

#[test]
fn compress_uses_configured_tools_and_reports_failure() {
    let exe = env!("CARGO_BIN_EXE_sfcc_compress");
    let dir = tempfile::tempdir().unwrap();
    let tools = dir.path().join("tools.json");
    fs::write(&tools, r#"{"gzip": "/nonexistent/gzip"}"#).unwrap();
    let output = run(
        exe,
        &[
            "compress", "raster", "nobwt", "nobtr", "gzip", "dem.sfcc",
            "--tools", tools.to_str().unwrap(), "--dry-run",
        ],
    );
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "/nonexistent/gzip -k -9 -f dem.sfcc\n");

    let output = run(
        exe,
        &["compress", "raster", "bwt", "nobtr", "rle", "dem.sfcc", "--dry-run"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid configuration"));
}

#[test]
fn configs_writes_driver_jobs() {
    let exe = env!("CARGO_BIN_EXE_sfcc_configs");
    let dir = tempfile::tempdir().unwrap();
    let jobs = dir.path().join("jobs.txt");
    let output = run(exe, &[jobs.to_str().unwrap(), "--sfc", "gray", "a.sfcc", "b.sfcc"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("rstr.none\n"));
    let text = fs::read_to_string(&jobs).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 26 * 2 * 2);
    assert!(lines.iter().all(|l| l.split(' ').nth(1) == Some("gray")));
}

#[test]
fn native_job_listing() {
    let exe = env!("CARGO_BIN_EXE_compress_config");
    let output = run(exe, &["dem.sfcc"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 32);
    assert!(stdout.contains("HILBERT\tBZIP_LZW\tdem.sfcc\n"));
}

#[test]
fn stats_prints_row_per_variant() {
    let exe = env!("CARGO_BIN_EXE_sfcc_stats");
    let dir = tempfile::tempdir().unwrap();
    write_sfcc(&dir.path().join("dem.sfcc"), &SfccHeader::raw(1, 2, 1), &[1, 2, 3, 4]);
    write_sfcc(&dir.path().join("dem.sfcc.gry"), &SfccHeader::raw(1, 2, 1), &[4, 3, 2, 1]);
    let prefix = dir.path().join("dem.sfcc");

    let output = run(exe, &[prefix.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Filename;sfc;bit-transposed;compression;Total Entropy;count"));
    let fields: Vec<&str> = lines[1].split(';').collect();
    assert_eq!(&fields[1..4], &["Raster", "False", "None"]);
    assert_eq!(&fields[5..7], &["4", "2.5"]);

    let output = run(exe, &["--header"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 1);
}

#[test]
fn du_report_to_csv() {
    let exe = env!("CARGO_BIN_EXE_sfcc_du_to_csv");
    let dir = tempfile::tempdir().unwrap();
    let du = dir.path().join("du.out");
    fs::write(&du, "120\t./dem.sfcc\n80\t./dem.sfcc.hbrt.lz77\n").unwrap();
    let output = run(exe, &[du.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "bytes,name,curve,compression,bittransposed\n80,dem,Hilbert,LZ77,False\n"
    );
}

const JOBLOG_HEADER: &str = "Seq\tHost\tStarttime\tJobRuntime\tSend\tReceive\tExitval\tSignal\tCommand\n";

fn joblog(path: &Path, commands: &[(f64, &str)]) {
    let mut text = JOBLOG_HEADER.to_string();
    for (i, (runtime, cmd)) in commands.iter().enumerate() {
        text.push_str(&format!("{}\t:\t1571920000.0\t{runtime}\t0\t0\t0\t0\t{cmd}\n", i + 1));
    }
    fs::write(path, text).unwrap();
}

#[test]
fn process_joins_sizes_and_runtimes() {
    let exe = env!("CARGO_BIN_EXE_sfcc_process");
    let dir = tempfile::tempdir().unwrap();
    let p = |name: &str| dir.path().join(name);

    fs::write(
        p("du.out"),
        "100\t./dem.sfcc\n90\t./dem.sfcc.hbrt\n40\t./dem.sfcc.hbrt.gz\n50\t./ska_1.sfcc.rle\n",
    )
    .unwrap();
    joblog(
        &p("c.log"),
        &[
            (1.0, "sfccompress compress -s HILBERT -c NONE dem.sfcc"),
            (3.0, "sfccompress compress -s ROW_MAJOR -c RLE ska_1.sfcc"),
        ],
    );
    joblog(&p("ce.log"), &[(0.5, "gzip -k -9 -f dem.sfcc.hbrt")]);
    joblog(
        &p("d.log"),
        &[
            (2.0, "sfccompress decompress dem.sfcc.hbrt"),
            (1.5, "sfccompress decompress ska_1.sfcc.rle"),
        ],
    );
    joblog(&p("de.log"), &[(0.25, "gzip -d -k -f dem.sfcc.hbrt.gz")]);
    fs::write(p("ignore.txt"), "unused\n").unwrap();

    let args = [
        p("du.out"),
        p("c.log"),
        p("ce.log"),
        p("d.log"),
        p("de.log"),
    ];
    let mut argv: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
    argv.extend(
        [
            "--output",
            p("srtm.csv").to_str().unwrap(),
            "--split-pattern",
            "ska",
            "--split-output",
            p("ska.csv").to_str().unwrap(),
            "--ignore",
            p("ignore.txt").to_str().unwrap(),
        ]
        .map(String::from),
    );
    let argv: Vec<&str> = argv.iter().map(String::as_str).collect();
    let output = run(exe, &argv);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let header = "bytes,runtime_compress,runtime_decompress,name,curve,compression,bwt,bitshuffle\n";
    assert_eq!(
        fs::read_to_string(p("ska.csv")).unwrap(),
        format!("{header}50,3000,1500,ska_1,Raster,RLE,False,False\n")
    );
    assert_eq!(
        fs::read_to_string(p("srtm.csv")).unwrap(),
        format!(
            "{header}100,,,dem,Raster,None,False,False\n\
             90,1000,2000,dem,Hilbert,None,False,False\n\
             40,1500,2250,dem,Hilbert,GZIP,False,False\n"
        )
    );
}

#[test]
fn process_fails_on_missing_runtime() {
    let exe = env!("CARGO_BIN_EXE_sfcc_process");
    let dir = tempfile::tempdir().unwrap();
    let p = |name: &str| dir.path().join(name).to_string_lossy().into_owned();
    fs::write(p("du.out"), "90\t./dem.sfcc.hbrt\n").unwrap();
    for log in ["c.log", "ce.log", "d.log", "de.log"] {
        joblog(Path::new(&p(log)), &[]);
    }
    let argv = [
        p("du.out"),
        p("c.log"),
        p("ce.log"),
        p("d.log"),
        p("de.log"),
        "--output".to_string(),
        p("out.csv"),
    ];
    let argv: Vec<&str> = argv.iter().map(String::as_str).collect();
    let output = run(exe, &argv);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 incomplete entries"));
}

#[test]
fn combiner_replaces_rows() {
    let exe = env!("CARGO_BIN_EXE_sfcc_stats_combiner");
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("orig.csv");
    let new = dir.path().join("new.csv");
    let out = dir.path().join("out.csv");
    fs::write(&original, "a,b,c,d,v\n1,2,3,4,old\n5,6,7,8,keep\n").unwrap();
    fs::write(&new, "a,b,c,d,v\n1,2,3,4,new\n").unwrap();
    let output = run(
        exe,
        &[original.to_str().unwrap(), new.to_str().unwrap(), out.to_str().unwrap()],
    );
    assert!(output.status.success());
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "a,b,c,d,v\n1,2,3,4,new\n5,6,7,8,keep\n"
    );
}
