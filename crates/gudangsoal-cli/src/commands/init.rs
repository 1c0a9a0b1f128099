//! The `gudangsoal init` command.

use std::path::Path;

use anyhow::Result;
use uuid::Uuid;

pub fn execute() -> Result<()> {
    if Path::new("gudangsoal.toml").exists() {
        println!("gudangsoal.toml already exists, skipping.");
    } else {
        std::fs::write("gudangsoal.toml", SAMPLE_CONFIG)?;
        println!("Created gudangsoal.toml");
    }

    std::fs::create_dir_all("questions")?;
    let example_path = Path::new("questions/contoh.toml");
    if example_path.exists() {
        println!("questions/contoh.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, example_bank())?;
        println!("Created questions/contoh.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: gudangsoal validate --bank questions");
    println!("  2. Run: gudangsoal list");
    println!("  3. Run: gudangsoal drill");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gudangsoal configuration

list_limit = 50

[store]
type = "bank"
path = "questions"

# To read from a PostgREST endpoint instead:
# [store]
# type = "postgrest"
# url = "https://your-project.supabase.co"
# api_key = "${GUDANGSOAL_API_KEY}"
"#;

/// Sample bank with one question of each type and fresh question ids.
fn example_bank() -> String {
    format!(
        r#"[bank]
id = "contoh"
name = "Contoh Soal"
description = "Example questions to get started"

[[questions]]
id = "{}"
type = "multiple_choice"
text = "Planet terdekat dari Matahari adalah ..."
difficulty = "mudah"
subchapter_id = "tata-surya"
chapter = "Bumi dan Antariksa"
subchapter = "Tata Surya"
answer_key = "A"
explanation = "Merkurius adalah planet dengan orbit terdekat ke Matahari."
options = [
    {{ key = "A", text = "Merkurius" }},
    {{ key = "B", text = "Venus" }},
    {{ key = "C", text = "Bumi" }},
    {{ key = "D", text = "Mars" }},
]

[[questions]]
id = "{}"
type = "true_false"
text = "Bulan memancarkan cahayanya sendiri."
difficulty = "mudah"
subchapter_id = "tata-surya"
chapter = "Bumi dan Antariksa"
subchapter = "Tata Surya"
answer_key = "F"
explanation = "Bulan memantulkan cahaya Matahari."
options = [{{ key = "T", text = "Benar" }}, {{ key = "F", text = "Salah" }}]

[[questions]]
id = "{}"
type = "multiple_answer"
text = "Manakah yang termasuk planet gas raksasa?"
difficulty = "sedang"
subchapter_id = "tata-surya"
chapter = "Bumi dan Antariksa"
subchapter = "Tata Surya"
answer_key = ["B", "C"]
explanation = "Jupiter dan Saturnus sebagian besar tersusun dari hidrogen dan helium."
options = [
    {{ key = "A", text = "Mars" }},
    {{ key = "B", text = "Jupiter" }},
    {{ key = "C", text = "Saturnus" }},
    {{ key = "D", text = "Merkurius" }},
]

[[questions]]
id = "{}"
type = "numerical_input"
text = """
Sebuah benda bergerak 100 m dalam 20 s.
Berapa kecepatan rata-ratanya dalam m/s?"""
difficulty = "sedang"
subchapter_id = "gerak-lurus"
chapter = "Kinematika"
subchapter = "Gerak Lurus"
answer_key = "5"
explanation = "v = s / t = 100 / 20 = 5 m/s."

[[questions]]
id = "{}"
type = "short_answer"
text = "Satuan SI untuk gaya adalah ..."
difficulty = "mudah"
subchapter_id = "gaya"
chapter = "Dinamika"
subchapter = "Hukum Newton"
answer_key = "Newton"
explanation = "1 newton = 1 kg·m/s²."
"#,
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gudangsoal_core::parser::{parse_question_bank_str, validate_question_bank};

    #[test]
    fn example_bank_is_valid() {
        let bank =
            parse_question_bank_str(&example_bank(), Path::new("questions/contoh.toml")).unwrap();
        assert_eq!(bank.questions.len(), 5);
        assert!(validate_question_bank(&bank).is_empty());
    }
}
