use serde::Serialize;
use undname::{classify, decode};

use crate::{
    app::GlobalOptions,
    output::{emit, Report},
};

#[derive(Debug, Serialize)]
pub struct DecodeInfo {
    pub symbol: String,
    pub rendered: String,
    pub decorated: bool,
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl Report for DecodeInfo {
    fn print_text(&self) {
        println!("{}", self.rendered);
    }
}

pub fn run(symbol: &str, opts: &GlobalOptions) -> anyhow::Result<()> {
    let decoded = decode(symbol);

    let info = DecodeInfo {
        symbol: symbol.to_string(),
        rendered: decoded.to_string(),
        decorated: decoded.is_decorated(),
        name: decoded.name_only(),
        category: classify::classify(&decoded).to_string(),
        class: classify::class_name(&decoded),
    };

    emit(&info, opts)
}
