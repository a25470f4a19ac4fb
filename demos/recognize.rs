use std::env;

use uiocr::{Alphabet, ModelRegistry, Ocr};

fn main() {
    let image = env::args().nth(1).expect("no image path");
    let model = env::args().nth(2).unwrap_or_else(|| "melon".to_string());

    let ocr = Ocr::new(ModelRegistry::builtin(), Alphabet::latin_upper(), ".");
    let result = ocr.recognize(&image, &model).unwrap();
    println!("{result}");
}
