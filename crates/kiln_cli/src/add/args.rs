use clap::Parser;

#[derive(Parser, Clone, Debug)]
pub struct AddArgs {
    /// file to add to the store
    pub path: String,
    /// store object name, defaults to the file name
    #[arg(short, long)]
    pub name: Option<String>,
    /// store path the object references, may be repeated
    #[arg(long = "ref")]
    pub refs: Vec<String>,
}
