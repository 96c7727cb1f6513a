//! Builds tables ahead of time and writes them to `OUT_DIR` as Rust expressions.

use frost::{
    codegen::{CodeGenerator, Codegen},
    hash::{DefaultEq, DefaultHasher},
    planner::Planner,
    Map, Set,
};
use std::path::Path;

#[path = "src/data.rs"]
mod data;

fn write<T: Codegen>(out_dir: &Path, name: &str, value: &T) {
    let code = CodeGenerator::new().generate(value);
    std::fs::write(out_dir.join(name), code.to_string()).expect("failed to write generated code");
}

fn main() {
    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-changed=src/data.rs");

    let out_dir = std::env::var_os("OUT_DIR").expect("OUT_DIR is not set");
    let out_dir = Path::new(&out_dir);

    write(out_dir, "init_seq.rs", &frost::make_set(data::INIT_SEQ));

    let keywords: Map<&str, usize> = Map::from_entries(
        data::KEYWORDS
            .iter()
            .enumerate()
            .map(|(index, keyword)| (*keyword, index))
            .collect(),
    );
    write(out_dir, "keywords.rs", &keywords);

    let strict = Set::try_build(
        data::KEYWORDS.to_vec(),
        None,
        &Planner::strict(),
        DefaultHasher::new(),
        DefaultEq::new(),
    )
    .expect("failed to build a collision-free keyword set");
    write(out_dir, "strict_keywords.rs", &strict);

    write(out_dir, "primes.rs", &frost::make_set(data::PRIMES));
}
