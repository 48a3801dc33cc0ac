use std::time::{Duration, Instant};
use rand::{seq::SliceRandom, thread_rng};
use reqwest::Client;
use hdrhistogram::Histogram;


// Fires concurrent joke requests at a running server and prints latency percentiles.
// Every request spends provider quota.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let url = std::env::args().nth(1).unwrap_or_else(|| "http://127.0.0.1:7860/api/joke".to_string());
    let clients = 4usize; // concurrent
    let total = 40usize; // total requests
    let languages = vec!["English", "Hinglish"];

    let client = Client::builder()
        .pool_idle_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(60))
        .build()?;
    let mut hist = Histogram::<u64>::new(3)?;
    let mut errors = 0usize;
    let mut warnings = 0usize;

    let start = Instant::now();
    let mut tasks = vec![];
    for _ in 0..clients {
        let client = client.clone();
        let url = url.clone();
        let languages = languages.clone();
        tasks.push(tokio::spawn(async move {
            let mut latencies = vec![];
            let (mut errs, mut warns) = (0, 0);
            for _ in 0..(total/clients) {
                let language = {
                    let mut rng = thread_rng();
                    languages.choose(&mut rng).copied().unwrap_or("English")
                };
                let t0 = Instant::now();
                let res = client.post(&url).json(&serde_json::json!({"language": language})).send().await;
                match res {
                    Ok(r) if r.status().is_success() => {
                        let body: serde_json::Value = r.json().await.unwrap_or_default();
                        latencies.push(t0.elapsed());
                        // the server answers 200 with a warning string when the provider fails
                        if body["joke"].as_str().map_or(true, |j| j.starts_with('⚠')) { warns += 1; }
                    }
                    _ => errs += 1,
                }
            }
            (latencies, errs, warns)
        }));
    }

    for t in tasks {
        let (ls, e, w) = t.await?;
        for d in ls { hist.record(d.as_millis() as u64).ok(); }
        errors += e;
        warnings += w;
    }

    println!("ran {} reqs in {:?}", total, start.elapsed());
    println!("errors: {}", errors);
    println!("warnings: {}", warnings);
    println!("p50: {} ms", hist.value_at_quantile(0.50));
    println!("p95: {} ms", hist.value_at_quantile(0.95));
    println!("p99: {} ms", hist.value_at_quantile(0.99));
    Ok(())
}
