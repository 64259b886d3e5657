//! Job lists for the external parallel job runner.
//!
//! Jobs are plain text lines, one per invocation. Running them in the order
//! produced here guarantees every job's input file was written by an earlier
//! job.

use std::collections::HashMap;

use crate::bench_config::BenchConfig;
use crate::vocab::Sfc;

/// Curves in the native `sfccompress` spelling.
pub const NATIVE_CURVES: [&str; 4] = ["ROW_MAJOR", "MORTON", "GRAY_CODE", "HILBERT"];
/// Internal schemes in the native `sfccompress` spelling.
pub const NATIVE_SCHEMES: [&str; 8] = [
    "HUFFMAN", "LZ77", "LZW", "RLE", "NONE", "BWT", "BZIP_LZ77", "BZIP_LZW",
];

/// `CURVE\tSCHEME\tfile` for every file, curve and internal scheme.
pub fn native_job_lines<S: AsRef<str>>(files: &[S]) -> Vec<String> {
    let mut lines = Vec::with_capacity(files.len() * NATIVE_CURVES.len() * NATIVE_SCHEMES.len());
    for file in files {
        for curve in NATIVE_CURVES {
            for scheme in NATIVE_SCHEMES {
                lines.push([curve, scheme, file.as_ref()].join("\t"));
            }
        }
    }
    lines
}

#[derive(Debug, Clone)]
struct Node {
    config: BenchConfig,
    children: Vec<usize>,
}

/// Configurations arranged by which output feeds which job.
#[derive(Debug, Clone)]
pub struct ConfigTree {
    nodes: Vec<Node>,
}

impl ConfigTree {
    /// Tree over every valid configuration.
    pub fn build() -> Self {
        Self::from_configs(BenchConfig::all_valid())
    }

    /// Tree restricted to configurations using `sfc`.
    pub fn for_sfc(sfc: Sfc) -> Self {
        Self::from_configs(BenchConfig::all_valid().into_iter().filter(|c| c.sfc == sfc))
    }

    /// Configurations whose `previous()` is not in the set hang off the root.
    pub fn from_configs<I: IntoIterator<Item = BenchConfig>>(configs: I) -> Self {
        let mut tree = ConfigTree {
            nodes: vec![Node {
                config: BenchConfig::ORIGINAL,
                children: Vec::new(),
            }],
        };
        let mut index: HashMap<BenchConfig, usize> = HashMap::new();
        index.insert(BenchConfig::ORIGINAL, 0);

        // Parents first: a job reading another job's output sorts after it.
        let (direct, derived): (Vec<_>, Vec<_>) = configs
            .into_iter()
            .filter(|c| !c.is_original())
            .partition(|c| c.previous().is_original());

        for config in direct.into_iter().chain(derived) {
            if index.contains_key(&config) {
                continue;
            }
            let parent = index.get(&config.previous()).copied().unwrap_or(0);
            let id = tree.nodes.len();
            tree.nodes.push(Node {
                config,
                children: Vec::new(),
            });
            tree.nodes[parent].children.push(id);
            index.insert(config, id);
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> &BenchConfig {
        &self.nodes[0].config
    }

    /// Configurations in pre-order, root first.
    pub fn pre_order(&self) -> Vec<BenchConfig> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![0usize];
        while let Some(id) = stack.pop() {
            out.push(self.nodes[id].config);
            stack.extend(self.nodes[id].children.iter().rev());
        }
        out
    }

    /// ASCII rendering of the tree, one configuration name per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.nodes[0].config.short_name());
        out.push('\n');
        self.render_children(0, "", &mut out);
        out
    }

    fn render_children(&self, id: usize, prefix: &str, out: &mut String) {
        let children = &self.nodes[id].children;
        for (i, &child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            out.push_str(prefix);
            out.push_str(if last { "+-- " } else { "|-- " });
            out.push_str(&self.nodes[child].config.short_name());
            out.push('\n');
            let nested = format!("{prefix}{}", if last { "    " } else { "|   " });
            self.render_children(child, &nested, out);
        }
    }

    /// Compress lines for every file, then decompress lines, per non-root
    /// configuration in pre-order.
    pub fn driver_job_lines<S: AsRef<str>>(&self, files: &[S]) -> Vec<String> {
        let mut lines = Vec::new();
        for config in self.pre_order().into_iter().skip(1) {
            let args = config.driver_args().join(" ");
            for direction in ["compress", "decompress"] {
                for file in files {
                    lines.push(format!("{direction} {args} {}", file.as_ref()));
                }
            }
        }
        lines
    }
}
