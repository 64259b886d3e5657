use honggfuzz::fuzz;
use sfcc_tools::name::{legacy_command_info, parse_command, parse_filename};

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if let Ok(text) = std::str::from_utf8(data) {
                if let Ok(name) = parse_filename(text) {
                    let rebuilt = name.config().expected_filename(&format!("{}.sfcc", name.filename));
                    assert_eq!(parse_filename(&rebuilt).map(|n| n.config()).ok(), Some(name.config()));
                }
                let _ = parse_command(text);
                let _ = legacy_command_info(text);
            }
        });
    }
}
