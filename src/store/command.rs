//! `AI.MODELSTORE` argument rendering.
//!
//! Kept separate from the client so the exact argument list can be checked
//! without a server.

use crate::core::{ModelBlob, ModelSpec};
use std::borrow::Cow;

/// Command that registers a model.
pub const MODELSTORE: &str = "AI.MODELSTORE";

/// Command that reads a model back.
pub const MODELGET: &str = "AI.MODELGET";

/// A single model registration: the spec plus a borrowed payload.
#[derive(Debug, Clone, Copy)]
pub struct ModelStoreRequest<'a> {
    /// Model description.
    pub spec: &'a ModelSpec,
    /// Serialized model.
    pub blob: &'a ModelBlob,
}

impl<'a> ModelStoreRequest<'a> {
    /// Pairs a spec with its payload.
    #[must_use]
    pub const fn new(spec: &'a ModelSpec, blob: &'a ModelBlob) -> Self {
        Self { spec, blob }
    }

    /// Arguments following the command name, in wire order.
    ///
    /// The payload is the last argument and is borrowed, not copied.
    #[must_use]
    pub fn args(&self) -> Vec<Cow<'a, [u8]>> {
        let spec = self.spec;
        let mut args: Vec<Cow<'a, [u8]>> = vec![
            Cow::Borrowed(spec.key.as_bytes()),
            Cow::Borrowed(spec.backend.as_str().as_bytes()),
            owned(spec.device.to_string()),
        ];

        if let Some(tag) = &spec.tag {
            args.push(Cow::Borrowed(b"TAG"));
            args.push(Cow::Borrowed(tag.as_bytes()));
        }
        if let Some(batch) = spec.batch_size {
            args.push(Cow::Borrowed(b"BATCHSIZE"));
            args.push(owned(batch.to_string()));
            if let Some(min) = spec.min_batch_size {
                args.push(Cow::Borrowed(b"MINBATCHSIZE"));
                args.push(owned(min.to_string()));
            }
        }
        if !spec.inputs.is_empty() {
            push_names(&mut args, b"INPUTS", &spec.inputs);
        }
        if !spec.outputs.is_empty() {
            push_names(&mut args, b"OUTPUTS", &spec.outputs);
        }

        args.push(Cow::Borrowed(b"BLOB"));
        args.push(Cow::Borrowed(self.blob.as_bytes()));
        args
    }
}

fn owned<'a>(s: String) -> Cow<'a, [u8]> {
    Cow::Owned(s.into_bytes())
}

fn push_names<'a>(args: &mut Vec<Cow<'a, [u8]>>, keyword: &'static [u8], names: &'a [String]) {
    args.push(Cow::Borrowed(keyword));
    args.push(owned(names.len().to_string()));
    args.extend(names.iter().map(|n| Cow::Borrowed(n.as_bytes())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Backend, Device};
    use std::path::PathBuf;

    fn as_strings(args: &[Cow<'_, [u8]>]) -> Vec<String> {
        args.iter()
            .map(|a| String::from_utf8_lossy(a).into_owned())
            .collect()
    }

    #[test]
    fn test_default_request_args() {
        let spec = ModelSpec::default();
        let blob = ModelBlob::new(PathBuf::from("career_model.pt"), vec![0xde, 0xad]);
        let args = ModelStoreRequest::new(&spec, &blob).args();

        assert_eq!(args.len(), 5);
        assert_eq!(
            as_strings(&args[..4]),
            vec!["career_model", "TORCH", "CPU", "BLOB"]
        );
        assert_eq!(&args[4][..], &[0xde_u8, 0xad]);
        assert!(matches!(args[4], Cow::Borrowed(_)));
    }

    #[test]
    fn test_full_request_args() {
        let spec = ModelSpec {
            key: "graph".to_string(),
            backend: Backend::Tf,
            device: Device::GpuN(1),
            tag: Some("v2".to_string()),
            batch_size: Some(8),
            min_batch_size: Some(2),
            inputs: vec!["a".to_string(), "b".to_string()],
            outputs: vec!["c".to_string()],
        };
        let blob = ModelBlob::new(PathBuf::from("graph.pb"), b"pb".to_vec());
        let args = ModelStoreRequest::new(&spec, &blob).args();

        assert_eq!(
            as_strings(&args),
            vec![
                "graph", "TF", "GPU:1", "TAG", "v2", "BATCHSIZE", "8", "MINBATCHSIZE", "2",
                "INPUTS", "2", "a", "b", "OUTPUTS", "1", "c", "BLOB", "pb",
            ]
        );
    }
}
