#![no_main]

use libfuzzer_sys::fuzz_target;

use stampost_core::config::StampostConfig;
use stampost_core::stage::StageRegistry;
use stampost_enricher::register_defaults;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // 파싱은 크래시나 패닉 없이 Ok 또는 Err을 반환해야 한다
    let Ok(config) = StampostConfig::parse(text) else {
        return;
    };

    // 파싱에 성공한 설정은 스테이지 조립도 패닉 없이 통과해야 한다
    let mut registry = StageRegistry::new();
    if register_defaults(&mut registry).is_err() {
        return;
    }
    let _ = registry.build_all(&config.stages);
});
