use std::collections::HashSet;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, put, web};
use clap::Parser;
use serde::Deserialize;

use rs_story_core::error::ChainError;
use rs_story_core::model::chain::MarkovChain;

/// HTTP front end for the word-level Markov chain model.
///
/// Context order and random seed are fixed at startup; training and
/// generation happen over HTTP.
#[derive(Parser)]
#[command(name = "rs-story-server")]
struct ServerArgs {
	/// Context order of the model (1 or 2)
	#[arg(long, default_value_t = 1)]
	order: usize,

	/// Random seed; defaults to a time-derived value
	#[arg(long)]
	seed: Option<u64>,

	/// Bind address
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Bind port
	#[arg(long, default_value_t = 5000)]
	port: u16,
}

/// Chain model dispatched on the order chosen at startup.
enum ChainHandle {
	Unigram(MarkovChain<1>),
	Bigram(MarkovChain<2>),
}

impl ChainHandle {
	fn new(order: usize, seed: Option<u64>) -> Result<Self, ChainError> {
		match order {
			1 => Ok(Self::Unigram(build_chain(seed)?)),
			2 => Ok(Self::Bigram(build_chain(seed)?)),
			other => Err(ChainError::UnsupportedOrder(other)),
		}
	}

	fn order(&self) -> usize {
		match self {
			Self::Unigram(_) => 1,
			Self::Bigram(_) => 2,
		}
	}

	fn process_string(&mut self, line: &str) -> HashSet<char> {
		match self {
			Self::Unigram(chain) => chain.process_string(line),
			Self::Bigram(chain) => chain.process_string(line),
		}
	}

	fn generate_story(&mut self, minimum_words: usize, attempts: usize) -> Result<String, ChainError> {
		match self {
			Self::Unigram(chain) => chain.generate_story(minimum_words, attempts),
			Self::Bigram(chain) => chain.generate_story(minimum_words, attempts),
		}
	}

	/// Looks up a follow probability; `None` if the context token count
	/// does not match the model order.
	fn follow_probability(&self, context: &[&str], target: &str) -> Option<f64> {
		match (self, context) {
			(Self::Unigram(chain), [a]) => Some(chain.follow_probability([a], target)),
			(Self::Bigram(chain), [a, b]) => Some(chain.follow_probability([a, b], target)),
			_ => None,
		}
	}

	fn context_count(&self) -> usize {
		match self {
			Self::Unigram(chain) => chain.context_count(),
			Self::Bigram(chain) => chain.context_count(),
		}
	}

	fn observation_count(&self) -> usize {
		match self {
			Self::Unigram(chain) => chain.observation_count(),
			Self::Bigram(chain) => chain.observation_count(),
		}
	}
}

fn build_chain<const N: usize>(seed: Option<u64>) -> Result<MarkovChain<N>, ChainError> {
	match seed {
		Some(seed) => MarkovChain::with_seed(seed),
		None => MarkovChain::new(),
	}
}

/// Query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	min_words: Option<usize>,
	attempts: Option<usize>,
}

/// Query parameters for the `/v1/probability` endpoint
#[derive(Deserialize)]
struct ProbabilityParams {
	/// Space-separated context tokens; count must match the model order
	context: String,
	next: String,
}

/// HTTP PUT endpoint `/v1/train`
///
/// Feeds every line of the plain-text body to the model, in order.
/// Responds with the deduplicated unrecognized characters encountered,
/// or an empty body if the text was clean.
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<ChainHandle>>, body: String) -> impl Responder {
	let mut chain = match data.lock() {
		Ok(c) => c,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let mut unrecognized = HashSet::new();
	for line in body.lines() {
		unrecognized.extend(chain.process_string(line));
	}

	// Sorted so repeated calls report in a stable order
	let mut characters: Vec<char> = unrecognized.into_iter().collect();
	characters.sort_unstable();
	let report: String = characters
		.iter()
		.map(|c| c.to_string())
		.collect::<Vec<_>>()
		.join(" ");

	HttpResponse::Ok().body(report)
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates a story of at least `min_words` tokens, retrying up to
/// `attempts` times on dead-ends. An exhausted retry budget maps to
/// 409 (the corpus is too thin, the caller can train more and retry);
/// an invariant violation maps to 500.
#[get("/v1/generate")]
async fn get_generated(
	data: web::Data<Mutex<ChainHandle>>,
	query: web::Query<GenerateParams>,
) -> impl Responder {
	let min_words = query.min_words.unwrap_or(100);
	let attempts = query.attempts.unwrap_or(1);

	let mut chain = match data.lock() {
		Ok(c) => c,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match chain.generate_story(min_words, attempts) {
		Ok(story) => HttpResponse::Ok().body(story),
		Err(e @ ChainError::InsufficientTrainingData { .. }) => {
			HttpResponse::Conflict().body(e.to_string())
		}
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

/// HTTP GET endpoint `/v1/probability`
///
/// Returns the probability of `next` following `context`. The context
/// is given as space-separated tokens and must match the model order.
#[get("/v1/probability")]
async fn get_probability(
	data: web::Data<Mutex<ChainHandle>>,
	query: web::Query<ProbabilityParams>,
) -> impl Responder {
	let context: Vec<&str> = query.context.split_whitespace().collect();

	let chain = match data.lock() {
		Ok(c) => c,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match chain.follow_probability(&context, &query.next) {
		Some(probability) => HttpResponse::Ok().body(probability.to_string()),
		None => HttpResponse::BadRequest().body(format!(
			"Context must contain exactly {} token(s)",
			chain.order()
		)),
	}
}

/// HTTP GET endpoint `/v1/stats`
///
/// Reports the model order and training volume.
#[get("/v1/stats")]
async fn get_stats(data: web::Data<Mutex<ChainHandle>>) -> impl Responder {
	let chain = match data.lock() {
		Ok(c) => c,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	HttpResponse::Ok().body(format!(
		"order={} contexts={} observations={}",
		chain.order(),
		chain.context_count(),
		chain.observation_count()
	))
}

/// Main entry point for the server.
///
/// Builds the chain model from the startup flags, wraps it in a `Mutex`,
/// and serves the training/generation endpoints.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let args = ServerArgs::parse();
	let chain = match ChainHandle::new(args.order, args.seed) {
		Ok(c) => c,
		Err(e) => return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())),
	};
	let shared_chain = web::Data::new(Mutex::new(chain));

	log::info!("Serving order-{} model on {}:{}", args.order, args.host, args.port);

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(shared_chain.clone())
			.service(put_train)
			.service(get_generated)
			.service(get_probability)
			.service(get_stats)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await
}
