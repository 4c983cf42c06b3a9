use criterion::{Criterion, criterion_group, criterion_main};
use verseface_engine::{parse_csv, parse_usfm};

fn generate_usfm(chapters: usize, verses: usize) -> String {
    let mut content = String::from("\\id PHM\n\\h Philemon\n");
    for chapter in 1..=chapters {
        content.push_str(&format!("\\c {chapter}\n\\p\n"));
        for verse in 1..=verses {
            content.push_str(&format!(
                "\\v {verse} Grace to you\\f + \\fr {chapter}:{verse} \\ft note\\f* and \\w peace|strong=\"G1515\"\\w* from God.\n"
            ));
            if verse % 10 == 0 {
                content.push_str("\\s1 Heading\n\\q1\n");
            }
        }
    }
    content
}

fn generate_csv(rows: usize) -> String {
    let mut content = String::from("Chapter,Verse,Face,Analysis\n");
    for row in 1..=rows {
        content.push_str(&format!(
            "1,{row},Mitigate Negative Face,\"A longer note, with a comma\nand a line break\"\n"
        ));
    }
    content
}

fn bench_parsers(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let usfm = generate_usfm(50, 30);
    group.bench_function("usfm_book", |b| {
        b.iter(|| std::hint::black_box(parse_usfm(std::hint::black_box(&usfm))));
    });

    let unclosed = format!("\\c 1 \\v 1 {}", "\\f dangling \\x open ".repeat(5_000));
    group.bench_function("usfm_unclosed_spans", |b| {
        b.iter(|| std::hint::black_box(parse_usfm(std::hint::black_box(&unclosed))));
    });

    let csv = generate_csv(1500);
    group.bench_function("csv_rows", |b| {
        b.iter(|| std::hint::black_box(parse_csv(std::hint::black_box(&csv))));
    });

    group.finish();
}

criterion_group!(benches, bench_parsers);
criterion_main!(benches);
