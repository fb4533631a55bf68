use collexeme::conllu::CoNLLUReader;
use divan::{Bencher, black_box};

fn main() {
    divan::main();
}

fn synthetic_conllu(sentences: usize) -> String {
    let mut text = String::new();
    for i in 0..sentences {
        text.push_str(&format!("# sent_id = {i}\n# text = The ice melted quickly.\n"));
        text.push_str("1\tThe\tthe\tDET\tDT\t_\t2\tdet\t_\t_\n");
        text.push_str("2\tice\tice\tNOUN\tNN\t_\t3\tnsubj\t_\t_\n");
        text.push_str("3\tmelted\tmelt\tVERB\tVBD\t_\t0\troot\t_\t_\n");
        text.push_str("4\tquickly\tquickly\tADV\tRB\t_\t3\tadvmod\t_\t_\n");
        text.push_str("5\t.\t.\tPUNCT\t.\t_\t3\tpunct\t_\tSpaceAfter=No\n\n");
    }
    text
}

/// Benchmark parsing a synthetic CoNLL-U document
#[divan::bench(args = [100, 10_000])]
fn parse_string(bencher: Bencher, sentences: usize) {
    let text = synthetic_conllu(sentences);
    bencher.bench_local(|| {
        for result in CoNLLUReader::from_string(black_box(&text)) {
            black_box(result.unwrap());
        }
    });
}
