use clap::Parser;

#[derive(Parser, Clone, Debug)]
pub struct EnsureArgs {
    /// printed store path, `<store_dir>/<hash>-<name>`
    pub path: String,
}
