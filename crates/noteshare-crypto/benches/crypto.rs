use noteshare_crypto::{decrypt, encrypt};

fn make_data(size: usize) -> Vec<u8> {
    (0..size)
        .map(|i| (i.wrapping_mul(7) ^ (i >> 3)) as u8)
        .collect()
}

#[divan::bench(args = [256, 2048, 65536])]
fn bench_encrypt(bencher: divan::Bencher, size: usize) {
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| encrypt(divan::black_box(&data)).unwrap());
}

#[divan::bench(args = [256, 2048, 65536])]
fn bench_decrypt(bencher: divan::Bencher, size: usize) {
    let data = make_data(size);
    let token = encrypt(&data).unwrap();
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| decrypt(divan::black_box(&token.c), divan::black_box(&token.k)).unwrap());
}

fn main() {
    divan::main();
}
