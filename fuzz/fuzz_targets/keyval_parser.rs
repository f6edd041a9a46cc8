#![no_main]

use libfuzzer_sys::fuzz_target;

use stampost_enricher::KeyValueSpec;

fuzz_target!(|input: (&str, &str)| {
    let (raw, separator) = input;

    // 파싱은 어떤 입력에도 패닉 없이 완료되어야 한다
    let outcome = KeyValueSpec::new(raw, separator).parse();

    // 저장된 키는 비어 있을 수 없다
    for (key, _) in outcome.headers.iter() {
        assert!(!key.is_empty());
    }
});
