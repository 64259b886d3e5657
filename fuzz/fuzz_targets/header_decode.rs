use honggfuzz::fuzz;
use sfcc_tools::SfccHeader;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if let Ok(header) = SfccHeader::decode(data) {
                let encoded = header.encode();
                assert_eq!(&encoded[..], &data[..encoded.len()]);
            }
        });
    }
}
