use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use zonefile::{ZoneParser, group_records, read_record_sets};

fn sample_zone(hosts: usize) -> String {
    let mut zone = String::from(
        "$ORIGIN bench.test.\n$TTL 3600\n\
         @ IN SOA ns1 hostmaster 1 7200 3600 1209600 300\n\
         @ IN NS ns1\n@ IN NS ns2\n\
         @ IN MX 10 mx1\n@ IN MX 20 mx2\n",
    );
    for i in 0..hosts {
        zone.push_str(&format!(
            "host{i} IN A 10.0.{}.{}\nhost{i} IN TXT \"v=spf1\" \"-all\"\n",
            i / 256,
            i % 256
        ));
    }
    zone
}

fn bench_parse(c: &mut Criterion) {
    let zone = sample_zone(1000);
    let parser = ZoneParser::new();

    c.bench_function("parse zone 1000 hosts", |b| {
        b.iter(|| parser.parse(black_box(&zone), None))
    });

    let records = parser.parse(&zone, None).unwrap();
    c.bench_function("group records", |b| {
        b.iter(|| group_records(black_box(records.clone())))
    });
}

fn bench_views(c: &mut Criterion) {
    let zone = sample_zone(1000);
    c.bench_function("rrsets view 1000 hosts", |b| {
        b.iter(|| read_record_sets(black_box(&zone), Some("bench.test.")))
    });
}

criterion_group!(benches, bench_parse, bench_views);
criterion_main!(benches);
