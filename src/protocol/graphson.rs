//! GraphSON codec
//!
//! Encodes bytecode and argument values, decodes response payloads.
//! Version 3 wraps every non-JSON-native value in `{"@type", "@value"}`;
//! version 2 keeps lists and maps as plain JSON. The decoder accepts both.

use crate::driver::{SessionError, SessionResult, WireEncoding};
use crate::protocol::bytecode::{Bytecode, Instruction};
use crate::structure::{Edge, GValue, Property, Vertex, VertexProperty, T};
use serde_json::{json, Map, Value};
use uuid::Uuid;

fn typed(type_name: &str, value: Value) -> Value {
    json!({ "@type": type_name, "@value": value })
}

/// Object key for a GraphSON v2 map entry
///
/// v2 maps are plain JSON objects, so keys travel as strings: strings as
/// is, tokens by their accessor name (`T::Label` becomes `"label"`), and
/// any other key by its display form. Keys that are not strings do not
/// survive a round trip; use v3 when that matters.
fn map_key(key: &GValue) -> String {
    match key {
        GValue::String(s) => s.clone(),
        GValue::Token(t) => t.as_str().to_string(),
        other => other.to_string(),
    }
}

/// Encode a value for the given wire encoding
pub fn encode_value(value: &GValue, encoding: WireEncoding) -> Value {
    let v3 = encoding == WireEncoding::GraphSonV3;
    match value {
        GValue::Null => Value::Null,
        GValue::Boolean(b) => json!(b),
        GValue::String(s) => json!(s),
        GValue::Int32(i) => typed("g:Int32", json!(i)),
        GValue::Int64(i) => typed("g:Int64", json!(i)),
        GValue::Float(f) => typed("g:Float", json!(f)),
        GValue::Double(f) => typed("g:Double", json!(f)),
        GValue::Uuid(u) => typed("g:UUID", json!(u.to_string())),
        GValue::Date(ms) => typed("g:Date", json!(ms)),
        GValue::List(items) | GValue::Set(items) => {
            let encoded: Vec<Value> = items.iter().map(|i| encode_value(i, encoding)).collect();
            match (v3, value) {
                (true, GValue::Set(_)) => typed("g:Set", Value::Array(encoded)),
                (true, _) => typed("g:List", Value::Array(encoded)),
                (false, _) => Value::Array(encoded),
            }
        }
        GValue::Map(entries) => {
            if v3 {
                let flat: Vec<Value> = entries
                    .iter()
                    .flat_map(|(k, v)| [encode_value(k, encoding), encode_value(v, encoding)])
                    .collect();
                typed("g:Map", Value::Array(flat))
            } else {
                let object: Map<String, Value> = entries
                    .iter()
                    .map(|(k, v)| (map_key(k), encode_value(v, encoding)))
                    .collect();
                Value::Object(object)
            }
        }
        GValue::Token(t) => typed("g:T", json!(t.as_str())),
        GValue::Vertex(v) => typed(
            "g:Vertex",
            json!({ "id": encode_value(&v.id, encoding), "label": v.label }),
        ),
        GValue::Edge(e) => typed(
            "g:Edge",
            json!({
                "id": encode_value(&e.id, encoding),
                "label": e.label,
                "outV": encode_value(&e.out_v.id, encoding),
                "outVLabel": e.out_v.label,
                "inV": encode_value(&e.in_v.id, encoding),
                "inVLabel": e.in_v.label,
            }),
        ),
        GValue::VertexProperty(vp) => typed(
            "g:VertexProperty",
            json!({
                "id": encode_value(&vp.id, encoding),
                "label": vp.label,
                "value": encode_value(&vp.value, encoding),
            }),
        ),
        GValue::Property(p) => typed(
            "g:Property",
            json!({ "key": p.key, "value": encode_value(&p.value, encoding) }),
        ),
    }
}

fn encode_instructions(instructions: &[Instruction], encoding: WireEncoding) -> Value {
    Value::Array(
        instructions
            .iter()
            .map(|i| {
                let mut parts = vec![json!(i.operator)];
                parts.extend(i.arguments.iter().map(|a| encode_value(a, encoding)));
                Value::Array(parts)
            })
            .collect(),
    )
}

/// Encode a traversal program
pub fn encode_bytecode(bytecode: &Bytecode, encoding: WireEncoding) -> Value {
    let mut body = Map::new();
    if !bytecode.sources().is_empty() {
        body.insert("source".to_string(), encode_instructions(bytecode.sources(), encoding));
    }
    if !bytecode.steps().is_empty() {
        body.insert("step".to_string(), encode_instructions(bytecode.steps(), encoding));
    }
    typed("g:Bytecode", Value::Object(body))
}

fn protocol(msg: impl Into<String>) -> SessionError {
    SessionError::Protocol(msg.into())
}

/// Decode a single value
pub fn decode_value(value: &Value) -> SessionResult<GValue> {
    match value {
        Value::Null => Ok(GValue::Null),
        Value::Bool(b) => Ok(GValue::Boolean(*b)),
        Value::String(s) => Ok(GValue::String(s.clone())),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(GValue::Int64(i)),
            None => n
                .as_f64()
                .map(GValue::Double)
                .ok_or_else(|| protocol(format!("Unrepresentable number: {}", n))),
        },
        Value::Array(items) => Ok(GValue::List(decode_list(items)?)),
        Value::Object(object) => match (object.get("@type"), object.get("@value")) {
            (Some(Value::String(type_name)), Some(inner)) => decode_typed(type_name, inner),
            (Some(Value::String(type_name)), None) => decode_typed(type_name, &Value::Null),
            _ => {
                let entries = object
                    .iter()
                    .map(|(k, v)| Ok((GValue::String(k.clone()), decode_value(v)?)))
                    .collect::<SessionResult<Vec<_>>>()?;
                Ok(GValue::Map(entries))
            }
        },
    }
}

/// Decode the `result.data` payload of a response into result items
pub fn decode_results(data: &Value) -> SessionResult<Vec<GValue>> {
    match data {
        Value::Null => Ok(Vec::new()),
        _ => match decode_value(data)? {
            GValue::List(items) | GValue::Set(items) => Ok(items),
            single => Ok(vec![single]),
        },
    }
}

/// Largest bulk a single traverser or bulk-set entry may expand to
pub const MAX_BULK: i64 = 1_000_000;

/// Push `bulk` copies of `value`
fn expand(out: &mut Vec<GValue>, value: GValue, bulk: i64) -> SessionResult<()> {
    if bulk > MAX_BULK {
        return Err(protocol(format!("Bulk {} exceeds the limit of {}", bulk, MAX_BULK)));
    }
    let copies = bulk.max(0) as usize;
    out.extend(std::iter::repeat(value).take(copies));
    Ok(())
}

/// Decode list items, expanding traversers by their bulk
fn decode_list(items: &[Value]) -> SessionResult<Vec<GValue>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match traverser(item) {
            Some((bulk, value)) => expand(&mut out, decode_value(value)?, bulk)?,
            None => out.push(decode_value(item)?),
        }
    }
    Ok(out)
}

fn traverser(item: &Value) -> Option<(i64, &Value)> {
    let object = item.as_object()?;
    if object.get("@type")?.as_str()? != "g:Traverser" {
        return None;
    }
    let inner = object.get("@value")?;
    let bulk = inner.get("bulk").map(integer_of).unwrap_or(Some(1))?;
    Some((bulk, inner.get("value")?))
}

fn integer_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::Object(o) => o.get("@value").and_then(|v| v.as_i64()),
        _ => None,
    }
}

fn decode_typed(type_name: &str, inner: &Value) -> SessionResult<GValue> {
    let number = || inner.as_f64().ok_or_else(|| protocol(format!("{} expects a number", type_name)));
    let integer = || inner.as_i64().ok_or_else(|| protocol(format!("{} expects an integer", type_name)));

    match type_name {
        "g:Int32" => {
            let i = integer()?;
            i32::try_from(i)
                .map(GValue::Int32)
                .map_err(|_| protocol(format!("g:Int32 out of range: {}", i)))
        }
        "g:Int64" => Ok(GValue::Int64(integer()?)),
        "g:Float" => Ok(GValue::Float(number()? as f32)),
        "g:Double" => Ok(GValue::Double(number()?)),
        "g:Date" | "g:Timestamp" => Ok(GValue::Date(integer()?)),
        "g:UUID" => {
            let s = inner.as_str().ok_or_else(|| protocol("g:UUID expects a string"))?;
            Uuid::parse_str(s)
                .map(GValue::Uuid)
                .map_err(|e| protocol(format!("Invalid g:UUID: {}", e)))
        }
        "g:List" => Ok(GValue::List(decode_list(array(type_name, inner)?)?)),
        "g:Set" => Ok(GValue::Set(decode_list(array(type_name, inner)?)?)),
        "g:BulkSet" => {
            let flat = array(type_name, inner)?;
            let mut out = Vec::new();
            for pair in flat.chunks(2) {
                let value = decode_value(&pair[0])?;
                let bulk = pair.get(1).and_then(integer_of).unwrap_or(1);
                expand(&mut out, value, bulk)?;
            }
            Ok(GValue::List(out))
        }
        "g:Map" => {
            let flat = array(type_name, inner)?;
            if flat.len() % 2 != 0 {
                return Err(protocol("g:Map must hold an even number of entries"));
            }
            let entries = flat
                .chunks_exact(2)
                .map(|pair| Ok((decode_value(&pair[0])?, decode_value(&pair[1])?)))
                .collect::<SessionResult<Vec<_>>>()?;
            Ok(GValue::Map(entries))
        }
        "g:T" => {
            let s = inner.as_str().ok_or_else(|| protocol("g:T expects a string"))?;
            T::from_accessor(s)
                .map(GValue::Token)
                .ok_or_else(|| protocol(format!("Unknown token: {}", s)))
        }
        "g:Direction" | "g:Class" => Ok(GValue::String(
            inner.as_str().ok_or_else(|| protocol(format!("{} expects a string", type_name)))?.to_string(),
        )),
        "g:Traverser" => {
            let value = inner.get("value").ok_or_else(|| protocol("g:Traverser without value"))?;
            decode_value(value)
        }
        "g:Vertex" => Ok(GValue::Vertex(Box::new(decode_vertex(inner)?))),
        "g:Edge" => Ok(GValue::Edge(Box::new(decode_edge(inner)?))),
        "g:VertexProperty" => Ok(GValue::VertexProperty(Box::new(decode_vertex_property(inner)?))),
        "g:Property" => Ok(GValue::Property(Box::new(decode_property(inner)?))),
        other => Err(protocol(format!("Unsupported GraphSON type: {}", other))),
    }
}

fn array<'a>(type_name: &str, inner: &'a Value) -> SessionResult<&'a [Value]> {
    inner
        .as_array()
        .map(|a| a.as_slice())
        .ok_or_else(|| protocol(format!("{} expects an array", type_name)))
}

fn field<'a>(inner: &'a Value, name: &str, owner: &str) -> SessionResult<&'a Value> {
    inner
        .get(name)
        .ok_or_else(|| protocol(format!("{} is missing '{}'", owner, name)))
}

fn label_of(inner: &Value, name: &str, default: &str) -> String {
    inner
        .get(name)
        .and_then(|l| l.as_str())
        .unwrap_or(default)
        .to_string()
}

fn decode_vertex(inner: &Value) -> SessionResult<Vertex> {
    let mut vertex = Vertex::new(decode_value(field(inner, "id", "g:Vertex")?)?, label_of(inner, "label", "vertex"));

    if let Some(Value::Object(properties)) = inner.get("properties") {
        for values in properties.values() {
            for value in values.as_array().map(|a| a.as_slice()).unwrap_or_default() {
                match decode_value(value)? {
                    GValue::VertexProperty(vp) => vertex.properties.push(*vp),
                    other => {
                        return Err(protocol(format!(
                            "Expected vertex property, found {}",
                            other.type_name()
                        )))
                    }
                }
            }
        }
    }
    Ok(vertex)
}

fn decode_edge(inner: &Value) -> SessionResult<Edge> {
    let mut edge = Edge {
        id: decode_value(field(inner, "id", "g:Edge")?)?,
        label: label_of(inner, "label", "edge"),
        out_v: Vertex::new(decode_value(field(inner, "outV", "g:Edge")?)?, label_of(inner, "outVLabel", "vertex")),
        in_v: Vertex::new(decode_value(field(inner, "inV", "g:Edge")?)?, label_of(inner, "inVLabel", "vertex")),
        properties: Vec::new(),
    };

    if let Some(Value::Object(properties)) = inner.get("properties") {
        for (key, value) in properties {
            let property = match decode_value(value)? {
                GValue::Property(p) => *p,
                plain => Property {
                    key: key.clone(),
                    value: plain,
                },
            };
            edge.properties.push(property);
        }
    }
    Ok(edge)
}

fn decode_vertex_property(inner: &Value) -> SessionResult<VertexProperty> {
    Ok(VertexProperty {
        id: inner.get("id").map(decode_value).transpose()?.unwrap_or(GValue::Null),
        label: label_of(inner, "label", ""),
        value: decode_value(field(inner, "value", "g:VertexProperty")?)?,
    })
}

fn decode_property(inner: &Value) -> SessionResult<Property> {
    Ok(Property {
        key: label_of(inner, "key", ""),
        value: decode_value(field(inner, "value", "g:Property")?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_scalars_v3() {
        let enc = WireEncoding::GraphSonV3;
        assert_eq!(encode_value(&"x".into(), enc), json!("x"));
        assert_eq!(encode_value(&1i32.into(), enc), json!({"@type": "g:Int32", "@value": 1}));
        assert_eq!(encode_value(&T::Id.into(), enc), json!({"@type": "g:T", "@value": "id"}));
        assert_eq!(
            encode_value(&GValue::List(vec![true.into()]), enc),
            json!({"@type": "g:List", "@value": [true]})
        );
    }

    #[test]
    fn test_encode_collections_v2() {
        let enc = WireEncoding::GraphSonV2;
        let map = GValue::Map(vec![("a".into(), 1i64.into())]);
        assert_eq!(encode_value(&map, enc), json!({"a": {"@type": "g:Int64", "@value": 1}}));
        assert_eq!(encode_value(&GValue::Set(vec!["s".into()]), enc), json!(["s"]));
    }

    #[test]
    fn test_encode_bytecode() {
        let mut bc = Bytecode::new();
        bc.add_step("V", vec![]);
        bc.add_step("has", vec!["age".into(), 29i32.into()]);
        let encoded = encode_bytecode(&bc, WireEncoding::GraphSonV3);
        assert_eq!(
            encoded,
            json!({
                "@type": "g:Bytecode",
                "@value": {
                    "step": [["V"], ["has", "age", {"@type": "g:Int32", "@value": 29}]]
                }
            })
        );

        let commit = encode_bytecode(&Bytecode::tx_commit(), WireEncoding::GraphSonV3);
        assert_eq!(commit["@value"], json!({"source": [["tx", "commit"]]}));
    }

    #[test]
    fn test_decode_vertex() {
        let payload = json!({
            "@type": "g:Vertex",
            "@value": {
                "id": {"@type": "g:Int64", "@value": 1},
                "label": "person",
                "properties": {
                    "name": [{
                        "@type": "g:VertexProperty",
                        "@value": {"id": {"@type": "g:Int64", "@value": 0}, "value": "marko", "label": "name"}
                    }]
                }
            }
        });
        let vertex = decode_value(&payload).unwrap();
        let vertex = vertex.as_vertex().unwrap();
        assert_eq!(vertex.id, GValue::Int64(1));
        assert_eq!(vertex.label, "person");
        assert_eq!(vertex.property("name"), Some(&GValue::from("marko")));
    }

    #[test]
    fn test_decode_edge() {
        let payload = json!({
            "@type": "g:Edge",
            "@value": {
                "id": {"@type": "g:Int32", "@value": 7},
                "label": "knows",
                "inVLabel": "person",
                "outVLabel": "person",
                "inV": {"@type": "g:Int32", "@value": 2},
                "outV": {"@type": "g:Int32", "@value": 1},
                "properties": {
                    "weight": {"@type": "g:Property", "@value": {"key": "weight", "value": {"@type": "g:Double", "@value": 0.5}}}
                }
            }
        });
        let edge = decode_value(&payload).unwrap();
        let edge = edge.as_edge().unwrap();
        assert_eq!(edge.to_string(), "e[7][1-knows->2]");
        assert_eq!(edge.property("weight"), Some(&GValue::Double(0.5)));
    }

    #[test]
    fn test_decode_results_expands_traversers() {
        let data = json!({
            "@type": "g:List",
            "@value": [
                {"@type": "g:Traverser", "@value": {"bulk": {"@type": "g:Int64", "@value": 2}, "value": "a"}},
                "b"
            ]
        });
        let results = decode_results(&data).unwrap();
        assert_eq!(results, vec!["a".into(), "a".into(), "b".into()]);
    }

    #[test]
    fn test_decode_map_and_untyped() {
        let data = json!({"@type": "g:Map", "@value": [{"@type": "g:T", "@value": "label"}, "person"]});
        let map = decode_value(&data).unwrap();
        assert_eq!(map.get(&T::Label.into()), Some(&GValue::from("person")));

        let plain = decode_value(&json!({"count": 3, "ratio": 0.5})).unwrap();
        assert_eq!(plain.get(&"count".into()), Some(&GValue::Int64(3)));
        assert_eq!(plain.get(&"ratio".into()), Some(&GValue::Double(0.5)));

        assert!(decode_results(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_encode_map_keys_v2() {
        let map = GValue::Map(vec![(T::Label.into(), "person".into()), (1i64.into(), true.into())]);
        assert_eq!(
            encode_value(&map, WireEncoding::GraphSonV2),
            json!({"label": "person", "1": true})
        );
    }

    #[test]
    fn test_bulk_limit() {
        let within = json!([
            {"@type": "g:Traverser", "@value": {"bulk": {"@type": "g:Int64", "@value": MAX_BULK}, "value": 1}}
        ]);
        assert_eq!(decode_results(&within).unwrap().len(), MAX_BULK as usize);

        let huge = json!([
            {"@type": "g:Traverser", "@value": {"bulk": {"@type": "g:Int64", "@value": 1_000_000_000_000i64}, "value": "x"}}
        ]);
        assert!(matches!(decode_results(&huge), Err(SessionError::Protocol(_))));

        let bulk_set = json!({"@type": "g:BulkSet", "@value": ["x", {"@type": "g:Int64", "@value": MAX_BULK + 1}]});
        assert!(decode_value(&bulk_set).is_err());

        let negative = json!([
            {"@type": "g:Traverser", "@value": {"bulk": -3, "value": "x"}}
        ]);
        assert!(decode_results(&negative).unwrap().is_empty());
    }

    #[test]
    fn test_decode_errors() {
        assert!(decode_value(&json!({"@type": "g:Int32", "@value": 10000000000i64})).is_err());
        assert!(decode_value(&json!({"@type": "g:Map", "@value": ["odd"]})).is_err());
        assert!(decode_value(&json!({"@type": "x:Unknown", "@value": 1})).is_err());
    }
}
