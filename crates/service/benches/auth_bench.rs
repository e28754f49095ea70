use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use service::auth::{AuthService, password::PasswordHasher, token::TokenIssuer};
use service::auth::repository::memory::InMemoryUserRepository;
use service::auth::domain::{RegisterInput, LoginInput};

fn bench_login(c: &mut Criterion) {
    let repo = Arc::new(InMemoryUserRepository::default());
    let hasher = PasswordHasher::new(19 * 1024, 2, 1).unwrap();
    let svc = AuthService::new(repo, hasher, TokenIssuer::new("secret"));

    // pre-create user outside of the benchmark using a tokio runtime
    let rt = tokio::runtime::Runtime::new().unwrap();
    let _ = rt.block_on(svc.register(RegisterInput { name: "Bench".into(), email: "bench@example.com".into(), password: "Benchmark1".into() }));

    c.bench_function("auth_login_verify", |b| {
        b.iter(|| {
            let _ = rt.block_on(svc.login(LoginInput { email: "bench@example.com".into(), password: "Benchmark1".into() })).unwrap();
        });
    });
}

criterion_group!(benches, bench_login);
criterion_main!(benches);
