use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gudangsoal_core::parser::{parse_question_bank_str, validate_question_bank};

fn bank_with(n: usize) -> String {
    let mut s = String::from("[bank]\nid = \"bench\"\nname = \"Bench\"\n");
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[questions]]
id = "q-{i}"
type = "multiple_choice"
text = "Question {i}"
difficulty = "sedang"
subchapter_id = "sub-{sub}"
answer_key = "B"
explanation = "Because B."
options = [{{ key = "A", text = "a" }}, {{ key = "B", text = "b" }}, {{ key = "C", text = "c" }}]
"#,
            sub = i % 5
        ));
    }
    s
}

fn bench_parse_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_bank");
    let path = Path::new("bench.toml");

    let small = bank_with(10);
    let large = bank_with(500);

    group.bench_function("10_questions", |b| {
        b.iter(|| parse_question_bank_str(black_box(&small), path))
    });

    group.bench_function("500_questions", |b| {
        b.iter(|| parse_question_bank_str(black_box(&large), path))
    });

    group.finish();
}

fn bench_validate_bank(c: &mut Criterion) {
    let bank = parse_question_bank_str(&bank_with(500), Path::new("bench.toml")).unwrap();

    c.bench_function("validate_500_questions", |b| {
        b.iter(|| validate_question_bank(black_box(&bank)))
    });
}

criterion_group!(benches, bench_parse_bank, bench_validate_bank);
criterion_main!(benches);
