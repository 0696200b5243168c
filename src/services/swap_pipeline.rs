use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use swap_engine::{ColorSwapper, ColorTransformer, Image, SwapInstruction};

use crate::error::{ConfigError, Limit, LimitExceeded, SwapError};
use crate::models::{AppConfig, InstructionPayload, LimitsConfig, OutputConfig};
use crate::rendering::{self, OutputFormat};

/// Pipeline states, in the order a successful request visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Received,
    Decoded,
    Matching(usize),
    Masking(usize),
    Transforming(usize),
    Encoded,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Received => f.write_str("received"),
            Stage::Decoded => f.write_str("decoded"),
            Stage::Matching(i) => write!(f, "matching #{i}"),
            Stage::Masking(i) => write!(f, "masking #{i}"),
            Stage::Transforming(i) => write!(f, "transforming #{i}"),
            Stage::Encoded => f.write_str("encoded"),
            Stage::Done => f.write_str("done"),
            Stage::Failed => f.write_str("failed"),
        }
    }
}

/// One image plus the ordered instructions to apply to it
#[derive(Debug, Clone)]
pub struct SwapRequest {
    /// Encoded PNG or JPEG bytes
    pub input: Vec<u8>,
    pub instructions: Vec<InstructionPayload>,
    /// `None` keeps the input format
    pub format: Option<OutputFormat>,
}

impl SwapRequest {
    pub fn new(input: Vec<u8>, instructions: Vec<InstructionPayload>) -> Self {
        Self {
            input,
            instructions,
            format: None,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }
}

/// Result of a successful request
#[derive(Debug, Clone)]
pub struct SwapOutput {
    /// Encoded output image
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    /// Wall-clock processing time
    pub elapsed: Duration,
    /// Every stage entered, in order
    pub stages: Vec<Stage>,
}

#[derive(Debug, Default)]
struct TokenState {
    cancelled: AtomicBool,
    stage: Mutex<Stage>,
}

/// Shared handle used to cancel a running request and observe its stage.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<TokenState>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Relaxed)
    }

    /// Last stage the request entered.
    pub fn stage(&self) -> Stage {
        match self.inner.stage.lock() {
            Ok(stage) => *stage,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn record(&self, stage: Stage) {
        match self.inner.stage.lock() {
            Ok(mut current) => *current = stage,
            Err(poisoned) => *poisoned.into_inner() = stage,
        }
    }
}

/// Cancellation flag plus optional deadline, checked at stage boundaries.
#[derive(Debug, Clone, Default)]
pub struct Budget {
    token: CancelToken,
    deadline: Option<Instant>,
}

impl Budget {
    /// No deadline and a token nobody else holds.
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn new(token: CancelToken, deadline: Option<Instant>) -> Self {
        Self { token, deadline }
    }

    fn check(&self, stage: Stage) -> Result<(), SwapError> {
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        if expired || self.token.is_cancelled() {
            Err(SwapError::Cancelled { stage })
        } else {
            Ok(())
        }
    }
}

/// Per-request stage log
struct Trace<'a> {
    stages: Vec<Stage>,
    budget: &'a Budget,
}

impl<'a> Trace<'a> {
    fn new(budget: &'a Budget) -> Self {
        let mut trace = Self {
            stages: Vec::new(),
            budget,
        };
        trace.enter(Stage::Received);
        trace
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!(%stage, "Pipeline stage");
        self.budget.token.record(stage);
        self.stages.push(stage);
    }

    fn current(&self) -> Stage {
        self.stages.last().copied().unwrap_or_default()
    }
}

/// Decode, apply instructions in order, encode.
///
/// Holds no per-request state, so one pipeline can serve any number of
/// concurrent requests.
#[derive(Debug, Clone)]
pub struct SwapPipeline {
    swapper: ColorSwapper,
    limits: LimitsConfig,
    output: OutputConfig,
}

impl SwapPipeline {
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            swapper: config.swapper()?,
            limits: config.limits.clone(),
            output: config.output.clone(),
        })
    }

    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Process a request without any time budget.
    pub fn process(&self, request: SwapRequest) -> Result<SwapOutput, SwapError> {
        self.process_with_budget(request, &Budget::unlimited())
    }

    /// Process a request, giving up at the first stage boundary after the
    /// budget runs out.
    pub fn process_with_budget(
        &self,
        request: SwapRequest,
        budget: &Budget,
    ) -> Result<SwapOutput, SwapError> {
        let started = Instant::now();
        let mut trace = Trace::new(budget);

        match self.run(request, &mut trace) {
            Ok((bytes, width, height, format)) => {
                trace.enter(Stage::Done);
                let elapsed = started.elapsed();
                tracing::info!(
                    width,
                    height,
                    %format,
                    bytes = bytes.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Swap complete"
                );
                Ok(SwapOutput {
                    bytes,
                    width,
                    height,
                    format,
                    elapsed,
                    stages: trace.stages,
                })
            }
            Err(e) => {
                let stage = trace.current();
                trace.enter(Stage::Failed);
                tracing::warn!(%stage, error = %e, "Swap failed");
                Err(e)
            }
        }
    }

    fn run(
        &self,
        request: SwapRequest,
        trace: &mut Trace<'_>,
    ) -> Result<(Vec<u8>, u32, u32, OutputFormat), SwapError> {
        let instructions = self.validate_instructions(&request.instructions)?;
        self.check_limits(&instructions, &request.input)?;

        let header = rendering::probe(&request.input)?;
        LimitExceeded::check(
            Limit::Width,
            header.width as u64,
            self.limits.max_width as u64,
        )?;
        LimitExceeded::check(
            Limit::Height,
            header.height as u64,
            self.limits.max_height as u64,
        )?;

        let decoded = rendering::decode(&request.input)?;
        trace.enter(Stage::Decoded);
        let (width, height) = (header.width, header.height);
        let format = request.format.unwrap_or(decoded.format);

        if instructions.is_empty() && format == decoded.format {
            trace.budget.check(Stage::Encoded)?;
            trace.enter(Stage::Encoded);
            return Ok((request.input, width, height, format));
        }

        let mut image = decoded.image;
        for (index, instruction) in instructions.iter().enumerate() {
            trace.budget.check(Stage::Matching(index))?;
            image = self.apply(image, index, instruction, trace)?;
        }

        trace.budget.check(Stage::Encoded)?;
        let bytes = rendering::encode(&image, format, &self.output)?;
        trace.enter(Stage::Encoded);
        Ok((bytes, width, height, format))
    }

    fn validate_instructions(
        &self,
        payloads: &[InstructionPayload],
    ) -> Result<Vec<SwapInstruction>, SwapError> {
        payloads
            .iter()
            .enumerate()
            .map(|(index, payload)| {
                payload
                    .validate()
                    .map_err(|e| SwapError::InvalidInstruction {
                        index,
                        reason: e.to_string(),
                    })
            })
            .collect()
    }

    fn check_limits(&self, instructions: &[SwapInstruction], input: &[u8]) -> Result<(), SwapError> {
        LimitExceeded::check(
            Limit::Instructions,
            instructions.len() as u64,
            self.limits.max_instructions as u64,
        )?;
        for instruction in instructions {
            LimitExceeded::check(
                Limit::FeatherRadius,
                instruction.tolerance.feather_radius() as u64,
                self.limits.max_feather_radius as u64,
            )?;
        }
        LimitExceeded::check(
            Limit::InputBytes,
            input.len() as u64,
            self.limits.max_input_bytes as u64,
        )?;
        Ok(())
    }

    fn apply(
        &self,
        image: Image,
        index: usize,
        instruction: &SwapInstruction,
        trace: &mut Trace<'_>,
    ) -> Result<Image, SwapError> {
        trace.enter(Stage::Matching(index));
        let raw = self.swapper.match_weights(&image, instruction);

        trace.enter(Stage::Masking(index));
        let mask = self
            .swapper
            .shape(raw, image.width(), image.height(), instruction);

        trace.enter(Stage::Transforming(index));
        let coverage = mask.coverage();
        tracing::debug!(
            index,
            source = %instruction.source,
            target = %instruction.target,
            coverage,
            "Applying instruction"
        );
        if coverage == 0 {
            return Ok(image);
        }
        ColorTransformer::new()
            .apply(&image, &mask, instruction.target)
            .map_err(|e| SwapError::Encode(format!("instruction {index}: {e}")))
    }
}
