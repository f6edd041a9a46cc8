#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use stampost_core::event::LogEvent;
use stampost_enricher::HeaderEnricherBuilder;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    key_values: String,
    separator: String,
    preserve_existing: bool,
    /// 이벤트에 미리 심어 둘 헤더 (최대 16개로 제한)
    existing_headers: Vec<(String, String)>,
    body: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(enricher) = HeaderEnricherBuilder::new()
        .key_values(input.key_values)
        .separator(input.separator)
        .preserve_existing(input.preserve_existing)
        .build()
    else {
        return;
    };

    let mut event = LogEvent::new(input.body, "fuzz");
    for (key, value) in input.existing_headers.into_iter().take(16) {
        event.set_header(key, value);
    }

    let before = event.headers.clone();
    enricher.enrich_batch(std::slice::from_mut(&mut event));

    // preserve 모드에서는 기존 헤더 값이 절대 바뀌지 않는다
    if input.preserve_existing {
        for (key, value) in &before {
            assert_eq!(event.headers.get(key), Some(value));
        }
    }
});
