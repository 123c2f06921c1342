use criterion::{black_box, criterion_group, criterion_main, Criterion};
use zhmatch_rs::{PhraseCombiner, Translator};

const TEXT: &str = "大道之行也，天下為公。選賢與能，講信修睦。故人不獨親其親，不獨子其子。";

fn make_translator() -> Translator {
    Translator::from_entries([
        ("大道", "the great way"),
        ("天下為公", "the world is shared by all"),
        ("選賢與能", "choose the worthy and able"),
        ("講信修睦", "cultivate trust and harmony"),
        ("不獨", "not only"),
        ("之", "的"),
        ("也", ""),
    ])
    .unwrap()
}

fn bench_translate(c: &mut Criterion) {
    let translator = make_translator();
    let line = TEXT.repeat(20);

    c.bench_function("translate_line", |b| {
        b.iter(|| translator.translate_line(black_box(&line)))
    });
}

fn bench_combine(c: &mut Criterion) {
    let combiner =
        PhraseCombiner::from_phrases([vec!["纽约", "时报"], vec!["人民", "日报"], vec!["中华", "人民", "共和国"]])
            .unwrap();
    let line = "他 在 纽约 时报 和 人民 日报 上 读到 中华 人民 共和国 的 消息 ".repeat(20);

    c.bench_function("combine_line", |b| {
        b.iter(|| combiner.combine_line(black_box(&line)))
    });
}

criterion_group!(benches, bench_translate, bench_combine);
criterion_main!(benches);
