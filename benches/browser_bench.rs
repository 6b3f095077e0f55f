// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use url::Url;

use skiff::browser::assets;
use skiff::dom::{parse_html, parse_html_with_url, Selector};
use skiff::FormFields;

fn page() -> String {
    let mut rows = String::new();
    for i in 0..200 {
        rows.push_str(&format!(
            r#"<li class="item{}"><a href="/item/{}">Item {}</a><img src="/img/{}.png" alt="{}"></li>"#,
            if i % 2 == 0 { " even" } else { "" },
            i,
            i,
            i,
            i
        ));
    }
    format!(
        r#"<!DOCTYPE html>
        <html>
        <head><title>Bench</title><link rel="stylesheet" href="/site.css"></head>
        <body>
            <div id="content"><ul>{}</ul>
                <form action="/submit" method="post" name="search">
                    <input type="text" name="query">
                    <input type="radio" name="scope" value="all" checked>
                    <input type="radio" name="scope" value="title">
                    <select name="sort"><option>date</option><option>name</option></select>
                    <input type="submit" name="go" value="Search">
                </form>
            </div>
            <script src="/app.js"></script>
        </body>
        </html>"#,
        rows
    )
}

fn html_parsing_benchmark(c: &mut Criterion) {
    let html = page();

    c.bench_function("parse_html", |b| {
        b.iter(|| black_box(parse_html(black_box(&html)).unwrap()))
    });
}

fn selector_benchmark(c: &mut Criterion) {
    let doc = parse_html(&page()).unwrap();

    c.bench_function("selector_parse", |b| {
        b.iter(|| black_box(Selector::parse("div#content > ul li.even a[href^='/item']").unwrap()))
    });

    c.bench_function("query_selector_all", |b| {
        b.iter(|| black_box(doc.query_selector_all("ul li.even a[href^='/item']").unwrap()))
    });
}

fn extraction_benchmark(c: &mut Criterion) {
    let url = Url::parse("http://bench.test/").unwrap();
    let doc = parse_html_with_url(&page(), Some(url.clone())).unwrap();

    c.bench_function("extract_links_and_images", |b| {
        b.iter(|| {
            black_box(assets::links(&doc, &url));
            black_box(assets::images(&doc, &url));
        })
    });

    let form = doc.query_selector("form").unwrap().unwrap();
    c.bench_function("form_fields_encode", |b| {
        b.iter(|| {
            let fields = FormFields::from_element(&form).unwrap();
            black_box(fields.encode(fields.button("go")))
        })
    });
}

criterion_group!(
    benches,
    html_parsing_benchmark,
    selector_benchmark,
    extraction_benchmark
);
criterion_main!(benches);
