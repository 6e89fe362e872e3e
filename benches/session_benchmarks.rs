use std::rc::Rc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use vocabdrill::corpus::schema::{TopicData, UnitData, WordData};
use vocabdrill::corpus::{Vocabulary, Word};
use vocabdrill::session::{InputKind, QuizMode, Response, SessionEngine, SessionStart};
use vocabdrill::store::MemoryMasteryStore;

fn make_vocab(count: usize) -> Vocabulary {
    let words = (0..count)
        .map(|i| WordData {
            id: format!("w{i}"),
            source: format!("palabra{i}"),
            native: format!("词{i}"),
            pos: "n.".to_string(),
        })
        .collect();
    let unit = UnitData {
        id: "u".to_string(),
        title: "Bench".to_string(),
        topics: vec![TopicData {
            id: "t".to_string(),
            title: "All".to_string(),
            words,
        }],
    };
    Vocabulary::from_units(vec![unit]).unwrap()
}

fn start(mode: QuizMode, words: &[Rc<Word>], rng: &mut SmallRng) -> SessionEngine {
    match SessionEngine::start(mode, words, &MemoryMasteryStore::new(), rng) {
        SessionStart::Ready(engine) => engine,
        SessionStart::NothingToPractice => unreachable!(),
    }
}

fn bench_queue_construction(c: &mut Criterion) {
    let vocab = make_vocab(500);
    let words = vocab.words().to_vec();
    let mut rng = SmallRng::seed_from_u64(1);

    c.bench_function("build test queue (500 words)", |b| {
        b.iter(|| start(QuizMode::Test, black_box(&words), &mut rng))
    });
}

fn bench_full_test_session(c: &mut Criterion) {
    let vocab = make_vocab(200);
    let words = vocab.words().to_vec();
    let mut rng = SmallRng::seed_from_u64(2);

    // Every tenth answer is a miss, so the queue keeps growing for a while.
    c.bench_function("run test session with misses (200 words)", |b| {
        b.iter(|| {
            let mut engine = start(QuizMode::Test, &words, &mut rng);
            let mut step = 0usize;
            while let Some(presentation) = engine.present(&vocab, &mut rng) {
                let task = engine.current_task().unwrap();
                let answer = if step % 10 == 0 && step < 2000 {
                    "x".to_string()
                } else {
                    task.expected_answer().to_string()
                };
                let response = match presentation.kind.input() {
                    InputKind::Choice => Response::Choice(answer),
                    InputKind::FreeText => Response::Text(answer),
                };
                engine.submit_answer(&response).unwrap();
                step += 1;
            }
            engine.report(&words)
        })
    });
}

criterion_group!(benches, bench_queue_construction, bench_full_test_session);
criterion_main!(benches);
